use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Invalid price {price} for {symbol} on {date}: prices must be positive and finite")]
    InvalidPrice {
        symbol: String,
        date: NaiveDate,
        price: f64,
    },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}
