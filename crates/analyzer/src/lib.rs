//! # Analyzer
//!
//! Head-to-head comparison of two baskets from their metric reports.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Logic:** depends only on `analytics` for the `MetricsReport` it reads.
//! - **Pure:** the comparator never fails and never touches I/O. Invalid values
//!   (NaN) simply never win a dimension.
//!
//! ## Public API
//!
//! - `Comparator`: scores CAGR, annual volatility, Sharpe ratio and max drawdown.
//! - `Comparison`: per-dimension outcomes, the score pair, the verdict and a recommendation.

pub mod comparator;

pub use comparator::{
    Comparator, Comparison, Dimension, DimensionOutcome, Recommendation, Side, Verdict,
};
