use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Failed to read price data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid value on line {line}: {message}")]
    Parse { line: u64, message: String },

    /// The source had no usable rows for the requested symbols.
    #[error("No price data available for {0}")]
    NoData(String),

    #[error("Invalid price data: {0}")]
    Core(#[from] core_types::CoreError),
}
