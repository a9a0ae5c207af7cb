//! # Portfolio Construction
//!
//! Turns a user's raw weight assignment and a multi-asset price matrix into the
//! single consolidated return series every downstream calculation consumes.
//!
//! ## Public API
//!
//! - `NormalizedWeights`: weights scaled to sum to one, validated against the price matrix.
//! - `ReturnBuilder`: the stateless builder producing `PortfolioReturns`.
//! - `PortfolioInput`: the immutable per-request weight entry for one basket.
//! - `PortfolioError`: the structural failures that abort a single portfolio's analysis.

pub mod builder;
pub mod error;
pub mod input;
pub mod weights;

pub use builder::{simple_returns, PortfolioReturns, ReturnBuilder};
pub use error::PortfolioError;
pub use input::PortfolioInput;
pub use weights::NormalizedWeights;
