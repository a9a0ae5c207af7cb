use crate::error::MarketDataError;
use crate::{PriceProvider, finish};
use core_types::{Period, PriceMatrix};

/// Serves prices from a matrix already held in memory.
#[derive(Debug, Clone)]
pub struct MemoryPriceProvider {
    matrix: PriceMatrix,
}

impl MemoryPriceProvider {
    pub fn new(matrix: PriceMatrix) -> Self {
        Self { matrix }
    }
}

impl PriceProvider for MemoryPriceProvider {
    fn fetch(&self, symbols: &[String], period: Period) -> Result<PriceMatrix, MarketDataError> {
        let known: Vec<String> = if symbols.is_empty() {
            self.matrix.symbols().to_vec()
        } else {
            symbols
                .iter()
                .filter(|s| self.matrix.column_index(s).is_some())
                .cloned()
                .collect()
        };
        finish(self.matrix.select(&known)?, symbols, period)
    }
}
