use core_types::CoreError;
use thiserror::Error;

/// Structural failures. Any of these aborts the analysis of one portfolio
/// without affecting another portfolio analyzed alongside it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    #[error("Invalid weight assignment: {0}")]
    InvalidWeight(String),

    #[error("Insufficient price history: {0}")]
    InsufficientData(String),

    #[error("No market data available: {0}")]
    MissingData(String),

    #[error("Malformed input: {0}")]
    Core(#[from] CoreError),
}
