use crate::error::AnalyticsError;
use crate::stats;
use core_types::{AssetReturns, ReturnSeries, SeriesPoint, TRADING_DAYS_PER_YEAR};
use ndarray::Axis;
use serde::Serialize;

/// Standalone performance of one instrument over the analysis window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetPerformance {
    pub symbol: String,
    pub total_return: f64,
    pub cagr: f64,
    /// Annualized sample volatility.
    pub volatility: f64,
    /// `(cagr - risk_free_rate) / volatility`, `0.0` for a flat instrument.
    pub sharpe_ratio: f64,
}

/// Scores every instrument on its own, best CAGR first.
pub fn asset_performance(returns: &AssetReturns, risk_free_rate: f64) -> Vec<AssetPerformance> {
    let mut rows: Vec<AssetPerformance> = returns
        .symbols()
        .iter()
        .zip(returns.values().axis_iter(Axis(1)))
        .map(|(symbol, column)| {
            let total_return = stats::total_return(column);
            let cagr = stats::annualized_growth(total_return, column.len());
            let volatility = stats::sample_std(column) * (TRADING_DAYS_PER_YEAR as f64).sqrt();
            let sharpe_ratio = if volatility != 0.0 {
                (cagr - risk_free_rate) / volatility
            } else {
                0.0
            };
            AssetPerformance {
                symbol: symbol.clone(),
                total_return,
                cagr,
                volatility,
                sharpe_ratio,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.cagr.total_cmp(&a.cagr));
    rows
}

/// Pairwise Pearson correlation of per-asset returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    /// Row-major, `values[i][j]` pairs `symbols[i]` with `symbols[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.values[i][j])
    }
}

/// Correlation of every pair of columns. The diagonal is `1.0`; a pair involving
/// a constant column correlates at `0.0`.
pub fn correlation_matrix(returns: &AssetReturns) -> CorrelationMatrix {
    let values = returns.values();
    let n = values.ncols();

    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let rho = stats::correlation(values.column(i), values.column(j));
            matrix[i][j] = rho;
            matrix[j][i] = rho;
        }
    }

    CorrelationMatrix {
        symbols: returns.symbols().to_vec(),
        values: matrix,
    }
}

/// Normalized Herfindahl index of a weight vector, from `0.0` (equal weights)
/// to `1.0` (everything in one holding).
///
/// Weights are rescaled to sum to one first. An empty or all-zero vector
/// scores `0.0`.
pub fn concentration_index(weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || total <= 0.0 {
        return 0.0;
    }
    if weights.len() == 1 {
        return 1.0;
    }

    let hhi: f64 = weights.iter().map(|w| (w / total).powi(2)).sum();
    let floor = 1.0 / weights.len() as f64;
    ((hhi - floor) / (1.0 - floor)).clamp(0.0, 1.0)
}

/// Annualized sample volatility over each trailing window of `window` returns,
/// dated at the window's last observation.
///
/// A series shorter than the window yields no points.
pub fn rolling_volatility(
    returns: &ReturnSeries,
    window: usize,
) -> Result<Vec<SeriesPoint>, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidParameter {
            name: "rolling_window",
            reason: "window must hold at least one observation".to_string(),
        });
    }

    let annualize = (TRADING_DAYS_PER_YEAR as f64).sqrt();
    let points = returns
        .values()
        .windows(window)
        .into_iter()
        .zip(returns.dates().iter().skip(window - 1))
        .map(|(slice, &date)| SeriesPoint {
            date,
            value: stats::sample_std(slice) * annualize,
        })
        .collect();

    Ok(points)
}
