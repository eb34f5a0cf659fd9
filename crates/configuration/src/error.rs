use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error("No access token configured. Set `api.access_token` or the {0} environment variable.")]
    MissingAccessToken(&'static str),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
