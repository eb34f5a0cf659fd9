use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Account {0} has no balance; cannot build a ledger for it")]
    NoBalance(String),

    #[error("Transfer cannot be executed: {0}")]
    InvalidTransfer(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Commit stopped after {executed} of {total} transfers: {source}")]
    PartialCommit {
        executed: usize,
        total: usize,
        #[source]
        source: Box<ExecutorError>,
    },
}
