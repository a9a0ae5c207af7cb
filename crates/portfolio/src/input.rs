use core_types::WeightAssignment;
use serde::{Deserialize, Serialize};

/// Weights are entered in percentage points and should add up to this total.
pub const FULL_ALLOCATION_PCT: f64 = 100.0;

/// How far the entered total may drift from `FULL_ALLOCATION_PCT`.
pub const ALLOCATION_TOLERANCE_PCT: f64 = 0.01;

/// The weights a user has entered for one basket.
///
/// Every edit produces a new value; nothing is kept between requests. Changing
/// how many symbols are selected resets all weights to an equal split.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioInput {
    weights: WeightAssignment,
}

impl PortfolioInput {
    /// Splits `FULL_ALLOCATION_PCT` evenly across `symbols`.
    pub fn equal_weight(symbols: &[String]) -> Self {
        if symbols.is_empty() {
            return Self::default();
        }
        let share = FULL_ALLOCATION_PCT / symbols.len() as f64;
        Self {
            weights: WeightAssignment::from_pairs(symbols.iter().map(|s| (s.clone(), share))),
        }
    }

    /// Rebuilds the input for a new selection.
    ///
    /// If the number of selected symbols changed, all weights reset to an equal
    /// split. Otherwise symbols that stay selected keep their weight and newly
    /// selected ones start at the equal share.
    pub fn reselect(&self, symbols: &[String]) -> Self {
        if symbols.len() != self.weights.len() {
            return Self::equal_weight(symbols);
        }
        let share = FULL_ALLOCATION_PCT / symbols.len().max(1) as f64;
        Self {
            weights: WeightAssignment::from_pairs(
                symbols
                    .iter()
                    .map(|s| (s.clone(), self.weights.get(s).unwrap_or(share))),
            ),
        }
    }

    /// Returns a copy with `symbol` set to `weight`. Unselected symbols are ignored.
    pub fn with_weight(&self, symbol: &str, weight: f64) -> Self {
        if self.weights.get(symbol).is_none() {
            tracing::debug!(symbol, "Ignoring weight for a symbol that is not selected");
            return self.clone();
        }
        Self {
            weights: WeightAssignment::from_pairs(
                self.weights
                    .iter()
                    .map(|(s, w)| (s.to_string(), if s == symbol { weight } else { w })),
            ),
        }
    }

    pub fn weights(&self) -> &WeightAssignment {
        &self.weights
    }

    pub fn into_weights(self) -> WeightAssignment {
        self.weights
    }

    pub fn total(&self) -> f64 {
        self.weights.total()
    }

    /// Signed distance of the entered total from a full allocation.
    pub fn allocation_gap(&self) -> f64 {
        self.total() - FULL_ALLOCATION_PCT
    }

    pub fn is_fully_allocated(&self) -> bool {
        !self.weights.is_empty() && self.allocation_gap().abs() <= ALLOCATION_TOLERANCE_PCT
    }
}

impl From<WeightAssignment> for PortfolioInput {
    fn from(weights: WeightAssignment) -> Self {
        Self { weights }
    }
}
