use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::ConfigError),

    #[error("API client error: {0}")]
    ApiClient(#[from] api_client::ApiError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] executor::ExecutorError),

    #[error("Giving up on {what} after {attempts} attempts: {source}")]
    FetchFailed {
        what: &'static str,
        attempts: u32,
        #[source]
        source: api_client::ApiError,
    },
}
