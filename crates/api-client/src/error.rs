use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The API returned {status}: {code} {message}")]
    Status {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid configuration for the API client: {0}")]
    InvalidConfig(String),
}
