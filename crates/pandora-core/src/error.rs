use thiserror::Error;

/// Top-level error type for Pandora configuration and shared plumbing.
#[derive(Error, Debug)]
pub enum PandoraError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
