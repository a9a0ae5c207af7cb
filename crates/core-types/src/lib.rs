//! # Core Types
//!
//! Layer 0 of the workspace: the immutable value objects every other crate
//! passes around. Nothing here performs analysis; constructors only enforce
//! the structural invariants (shapes, ordering, positive prices).

pub mod constants;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use constants::{TRADING_DAYS_PER_MONTH, TRADING_DAYS_PER_YEAR};
pub use enums::Period;
pub use error::CoreError;
pub use structs::{AssetReturns, Holding, PriceMatrix, ReturnSeries, SeriesPoint, WeightAssignment};
