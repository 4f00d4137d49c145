use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid address in `{field}` ({value}): {reason}")]
    InvalidAddress {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
