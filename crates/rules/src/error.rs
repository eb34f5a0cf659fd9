use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuleError {
    #[error("Funding fraction must be between 0 and 1, got {0}")]
    InvalidFraction(Decimal),

    #[error("A calculation error occurred: {0}")]
    Calculation(String),
}
