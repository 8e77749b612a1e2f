use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A template failed to parse while the template set was being loaded.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Missing template: {0}")]
    MissingTemplate(String),

    /// Rendering one view failed. Scoped to the request that asked for it.
    #[error("Failed to render {template}: {source}")]
    Render {
        template: &'static str,
        #[source]
        source: tera::Error,
    },

    #[error("Invalid job id: {0:?}")]
    InvalidJobId(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// True for errors caused by what the client asked for rather than by the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::InvalidJobId(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
