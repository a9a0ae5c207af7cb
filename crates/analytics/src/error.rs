use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Drawdown series has {drawdown} entries but the return series has {returns}")]
    LengthMismatch { returns: usize, drawdown: usize },
}
