use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be parsed or a value has the wrong type.
    #[error("Failed to read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
