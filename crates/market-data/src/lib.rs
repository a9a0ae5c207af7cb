//! # Market Data
//!
//! The seam between the analysis layers and wherever prices come from.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 I/O:** this is the only crate besides the binary that touches the
//!   filesystem. Everything it hands out is an already-validated `PriceMatrix`.
//! - **Swappable providers:** callers depend on the `PriceProvider` trait, so a
//!   file-backed provider and an in-memory one are interchangeable.
//!
//! ## Public API
//!
//! - `PriceProvider`: fetch close prices for a set of symbols over a `Period`.
//! - `CsvPriceProvider`: reads a wide CSV (`date,SYM1,SYM2,...`).
//! - `MemoryPriceProvider`: serves a matrix held in memory.
//! - `MarketDataError`: the specific error types that can be returned from this crate.

use core_types::{Period, PriceMatrix};

pub mod csv_provider;
pub mod error;
pub mod memory;

pub use csv_provider::CsvPriceProvider;
pub use error::MarketDataError;
pub use memory::MemoryPriceProvider;

/// The abstract interface for a source of historical close prices.
///
/// Implementations return the trailing `period.price_rows()` rows on which every
/// returned symbol has a price. Requested symbols the source does not know are
/// left out of the result; an empty `symbols` slice asks for every symbol.
/// A result with no usable rows is reported as `MarketDataError::NoData`.
pub trait PriceProvider: Send + Sync {
    fn fetch(&self, symbols: &[String], period: Period) -> Result<PriceMatrix, MarketDataError>;
}

/// Shared tail end of every provider: trims to the period and rejects empty results.
pub(crate) fn finish(
    matrix: PriceMatrix,
    symbols: &[String],
    period: Period,
) -> Result<PriceMatrix, MarketDataError> {
    let matrix = matrix.tail(period.price_rows());
    if matrix.is_empty() {
        let wanted = if symbols.is_empty() {
            "any symbol".to_string()
        } else {
            symbols.join(", ")
        };
        return Err(MarketDataError::NoData(format!("{} over {}", wanted, period)));
    }

    tracing::debug!(
        rows = matrix.len(),
        symbols = matrix.symbols().len(),
        %period,
        "Fetched price matrix"
    );
    Ok(matrix)
}
