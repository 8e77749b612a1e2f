//! Command handlers for the `browsermr` binary

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::ServerConfig;
use crate::render::{TemplateSource, ViewRenderer};
use crate::server::JobServer;

pub mod args;

pub use args::{Cli, Commands, ServeArgs};

/// Load configuration from file and environment, then apply `serve` flags.
pub fn resolve_config(cli: &Cli, serve: &ServeArgs) -> Result<ServerConfig> {
    let mut config =
        ServerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    serve.apply(&mut config);
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

/// Load templates, seed the allocator, then serve until Ctrl+C.
pub async fn run_serve(config: ServerConfig) -> Result<()> {
    let server = JobServer::from_config(&config)?;
    server.start().await
}

/// Log filter directives for the subscriber.
///
/// `-v` flags win. Without them a non-blank `RUST_LOG` is used, then the
/// configured level.
pub fn log_directives(verbose: u8, rust_log: Option<&str>, configured: &str) -> String {
    match verbose {
        0 => rust_log
            .map(str::trim)
            .filter(|directives| !directives.is_empty())
            .unwrap_or(configured)
            .to_string(),
        1 => "debug".to_string(),
        2 => "trace".to_string(),
        _ => "trace,hyper=debug,tower=debug".to_string(), // -vvv shows everything including dependencies
    }
}

pub fn run_check_templates(source: &TemplateSource) -> Result<()> {
    let renderer = ViewRenderer::load(source)
        .with_context(|| format!("Template set {source:?} is not usable"))?;

    println!("Template set {source:?} is complete:");
    for name in renderer.template_names() {
        println!("  {name}");
    }
    Ok(())
}
