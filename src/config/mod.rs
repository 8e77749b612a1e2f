//! Server configuration
//!
//! Values are layered, lowest priority first: built-in defaults, a TOML
//! file, `BROWSERMR_*` environment variables, then command-line flags
//! (applied by the binary).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ids::DEFAULT_ID_BOUND;
use crate::render::TemplateSource;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "browsermr.toml";

pub const DEFAULT_PORT: u16 = 5500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Load page templates from this directory instead of the built-in set.
    pub templates_dir: Option<PathBuf>,
    /// Serve files under `/static` from this directory.
    pub static_dir: Option<PathBuf>,
    /// Exclusive upper bound of the numeric job id space.
    pub id_bound: u64,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            templates_dir: None,
            static_dir: None,
            id_bound: DEFAULT_ID_BOUND,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load defaults, then the config file, then the environment.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.merge_env_vars();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_env_with(|key| std::env::var(key).ok());
    }

    /// Apply `BROWSERMR_*` overrides read through `lookup`.
    pub fn merge_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BROWSERMR_HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("BROWSERMR_PORT") {
            match port.parse::<u16>() {
                Ok(value) => self.port = value,
                Err(_) => warn!("Ignoring BROWSERMR_PORT={:?}: not a port number", port),
            }
        }

        if let Some(dir) = lookup("BROWSERMR_TEMPLATES_DIR") {
            self.templates_dir = Some(PathBuf::from(dir));
        }

        if let Some(dir) = lookup("BROWSERMR_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }

        if let Some(bound) = lookup("BROWSERMR_ID_BOUND") {
            match bound.parse::<u64>() {
                Ok(value) => self.id_bound = value,
                Err(_) => warn!("Ignoring BROWSERMR_ID_BOUND={:?}: not a number", bound),
            }
        }

        if let Some(level) = lookup("BROWSERMR_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id_bound == 0 {
            return Err(Error::Config("id_bound must be at least 1".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn template_source(&self) -> TemplateSource {
        TemplateSource::from_dir(self.templates_dir.clone())
    }
}
