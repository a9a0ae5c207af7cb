use crate::stats;
use chrono::NaiveDate;
use core_types::{PriceMatrix, ReturnSeries, TRADING_DAYS_PER_YEAR};
use ndarray::{Array1, ArrayView1};
use serde::Serialize;
use std::collections::HashMap;

/// Returns of `symbol` in `prices` over the holding periods of a series priced
/// on `dates`.
///
/// Each entry covers one pair of consecutive `dates` and is dated by the later
/// one, so it lines up with the portfolio return for the same interval even
/// when rows are missing on either side. Intervals where the benchmark lacks a
/// price at either end are skipped. `None` when `symbol` is not in `prices`.
pub fn matched_returns(
    dates: &[NaiveDate],
    prices: &PriceMatrix,
    symbol: &str,
) -> Option<ReturnSeries> {
    let column = prices.column(symbol)?;
    let by_date: HashMap<NaiveDate, f64> = prices
        .dates()
        .iter()
        .copied()
        .zip(column.iter().copied())
        .collect();

    let (matched, values): (Vec<NaiveDate>, Vec<f64>) = dates
        .windows(2)
        .filter_map(|pair| {
            let previous = by_date.get(&pair[0])?;
            let current = by_date.get(&pair[1])?;
            Some((pair[1], current / previous - 1.0))
        })
        .unzip();

    ReturnSeries::new(matched, Array1::from(values)).ok()
}

/// Pairs up observations of `returns` and `benchmark` that share a date.
///
/// The result follows the order of `returns`; dates missing from either side
/// are skipped.
pub fn align(returns: &ReturnSeries, benchmark: &ReturnSeries) -> (Array1<f64>, Array1<f64>) {
    let by_date: HashMap<NaiveDate, f64> = benchmark
        .dates()
        .iter()
        .copied()
        .zip(benchmark.values().iter().copied())
        .collect();

    let (r, b): (Vec<f64>, Vec<f64>) = returns
        .dates()
        .iter()
        .zip(returns.values().iter())
        .filter_map(|(date, &r)| by_date.get(date).map(|&b| (r, b)))
        .unzip();
    (Array1::from(r), Array1::from(b))
}

/// Sensitivity of `returns` to `market`: sample covariance over the population
/// variance of the market.
///
/// `0.0` with fewer than two paired observations or a flat market. Because the
/// denominators differ, a series regressed on itself gives `n / (n - 1)`.
pub fn beta(returns: ArrayView1<f64>, market: ArrayView1<f64>) -> f64 {
    if returns.len() < 2 || market.len() < 2 {
        return 0.0;
    }
    let market_variance = stats::population_var(market);
    if market_variance == 0.0 {
        return 0.0;
    }
    stats::sample_covariance(returns, market) / market_variance
}

/// Annualized standard deviation of the active return `returns - benchmark`.
pub fn tracking_error(active: ArrayView1<f64>) -> f64 {
    stats::sample_std(active) * (TRADING_DAYS_PER_YEAR as f64).sqrt()
}

/// Annualized mean active return per unit of tracking error, `0.0` when the
/// tracking error is zero.
pub fn information_ratio(active: ArrayView1<f64>) -> f64 {
    let te = tracking_error(active);
    if te == 0.0 {
        return 0.0;
    }
    stats::mean(active) * TRADING_DAYS_PER_YEAR as f64 / te
}

/// Statistics of a portfolio measured against an external benchmark series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkComparison {
    /// Number of dates both series have in common.
    pub observations: usize,
    pub beta: f64,
    /// Jensen's alpha, annualized.
    pub alpha: f64,
    pub correlation: f64,
    pub tracking_error: f64,
    pub information_ratio: f64,
    pub benchmark_annual_return: f64,
}

/// Compares `returns` with `benchmark` over their common dates.
///
/// Alpha is `annual_return - (r_f + beta * (benchmark_annual_return - r_f))`
/// with both annual returns taken as `mean * 252` over the common dates.
pub fn compare_to_benchmark(
    returns: &ReturnSeries,
    benchmark: &ReturnSeries,
    risk_free_rate: f64,
) -> BenchmarkComparison {
    let (r, b) = align(returns, benchmark);
    let active = &r - &b;

    let beta = beta(r.view(), b.view());
    let annual = stats::mean(r.view()) * TRADING_DAYS_PER_YEAR as f64;
    let benchmark_annual = stats::mean(b.view()) * TRADING_DAYS_PER_YEAR as f64;
    let alpha = if r.is_empty() {
        0.0
    } else {
        annual - (risk_free_rate + beta * (benchmark_annual - risk_free_rate))
    };

    tracing::debug!(observations = r.len(), beta, alpha, "Compared portfolio to benchmark");

    BenchmarkComparison {
        observations: r.len(),
        beta,
        alpha,
        correlation: stats::correlation(r.view(), b.view()),
        tracking_error: tracking_error(active.view()),
        information_ratio: information_ratio(active.view()),
        benchmark_annual_return: benchmark_annual,
    }
}
