use analytics::AnalyticsError;
use market_data::MarketDataError;
use portfolio::PortfolioError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    #[error("Metrics calculation failed: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Market data error: {0}")]
    MarketData(MarketDataError),
}

/// An empty result from the provider is the portfolio layer's `MissingData`;
/// every other provider failure stays a market-data error.
impl From<MarketDataError> for PipelineError {
    fn from(err: MarketDataError) -> Self {
        match err {
            MarketDataError::NoData(what) => {
                PipelineError::Portfolio(PortfolioError::MissingData(what))
            }
            other => PipelineError::MarketData(other),
        }
    }
}

impl PipelineError {
    /// True for the structural failures of a single basket (bad weights, too
    /// little or no data), as opposed to I/O or calculation problems.
    pub fn is_structural(&self) -> bool {
        matches!(self, PipelineError::Portfolio(_))
    }
}
