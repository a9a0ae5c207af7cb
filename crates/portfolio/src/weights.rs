use crate::error::PortfolioError;
use core_types::{Holding, WeightAssignment};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Weights divided by their sum, one entry per symbol of the assignment.
///
/// Only `normalize` constructs this type, so every instance sums to one within
/// floating tolerance and references symbols known to the price matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeights {
    holdings: Vec<Holding>,
}

impl NormalizedWeights {
    /// Validates `assignment` against the symbols a price matrix provides and
    /// scales it to sum to one.
    ///
    /// # Errors
    ///
    /// `PortfolioError::InvalidWeight` when the assignment is empty, a symbol's
    /// total weight is zero, negative or not finite, a symbol is absent from
    /// `universe`, or the sum of the weights is not a positive finite number.
    pub fn normalize(
        assignment: &WeightAssignment,
        universe: &[String],
    ) -> Result<Self, PortfolioError> {
        if assignment.is_empty() {
            return Err(PortfolioError::InvalidWeight(
                "no symbols were assigned a weight".to_string(),
            ));
        }

        for (symbol, weight) in assignment.iter() {
            if !weight.is_finite() {
                return Err(PortfolioError::InvalidWeight(format!(
                    "weight for {} is not a finite number",
                    symbol
                )));
            }
            if weight < 0.0 {
                return Err(PortfolioError::InvalidWeight(format!(
                    "total weight for {} is negative ({})",
                    symbol, weight
                )));
            }
            if weight == 0.0 {
                return Err(PortfolioError::InvalidWeight(format!(
                    "total weight for {} is zero",
                    symbol
                )));
            }
            if !universe.iter().any(|s| s == symbol) {
                return Err(PortfolioError::InvalidWeight(format!(
                    "{} is not present in the price data",
                    symbol
                )));
            }
        }

        let total = assignment.total();
        if total <= 0.0 {
            return Err(PortfolioError::InvalidWeight(
                "weights sum to zero".to_string(),
            ));
        }
        if !total.is_finite() {
            return Err(PortfolioError::InvalidWeight(format!(
                "weights sum to {}, which is too large to normalize",
                total
            )));
        }

        let holdings = assignment
            .iter()
            .map(|(symbol, weight)| Holding {
                symbol: symbol.to_string(),
                weight: weight / total,
            })
            .collect();

        Ok(Self { holdings })
    }

    /// Holdings in assignment order.
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn symbols(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.symbol.clone()).collect()
    }

    pub fn weight(&self, symbol: &str) -> Option<f64> {
        self.holdings
            .iter()
            .find(|h| h.symbol == symbol)
            .map(|h| h.weight)
    }

    /// Weights as a column vector aligned with `symbols()`.
    pub fn as_array(&self) -> Array1<f64> {
        self.holdings.iter().map(|h| h.weight).collect()
    }

    pub fn total(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight).sum()
    }

    /// Holdings sorted by weight, largest first. Equal weights keep assignment order.
    pub fn composition(&self) -> Vec<Holding> {
        let mut sorted = self.holdings.clone();
        sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        sorted
    }
}
