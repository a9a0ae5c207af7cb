//! # Pipeline
//!
//! Composes the layers into the per-portfolio analysis the application runs:
//! fetch prices, blend the basket, track drawdown, compute metrics.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Orchestration:** no calculations live here, only the order in which
//!   the lower layers are called and how their errors are surfaced.
//! - **All or nothing per basket:** a `PortfolioAnalysis` is either complete or an
//!   error. When two baskets are analyzed together each succeeds or fails on its own.
//!
//! ## Public API
//!
//! - `PortfolioPipeline`: `analyze`, `compare` (parallel) and `assets`.
//! - `AnalysisOptions`: period, metric parameters and presentation settings.
//! - `PipelineError`: wraps portfolio, analytics and market-data failures.

pub mod analysis;
pub mod error;
pub mod options;

pub use analysis::{AssetReport, PairAnalysis, PortfolioAnalysis, PortfolioPipeline};
pub use error::PipelineError;
pub use options::AnalysisOptions;
