use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration file not found at {0}")]
    NotFound(String),

    #[error("Configuration validation error: {}", .0.join("; "))]
    ValidationError(Vec<String>),
}
