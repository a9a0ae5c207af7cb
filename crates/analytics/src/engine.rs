use crate::benchmark;
use crate::drawdown::{DrawdownSeries, underwater_runs};
use crate::error::AnalyticsError;
use crate::report::MetricsReport;
use crate::stats;
use core_types::{ReturnSeries, TRADING_DAYS_PER_MONTH, TRADING_DAYS_PER_YEAR};
use ndarray::{Array1, ArrayView1};

/// Annual risk-free rate used when none is configured (6.5%).
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.065;

/// Confidence level for Value at Risk when none is configured.
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

/// Inputs to the metrics calculation besides the series themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsParams {
    /// Annual risk-free rate as a fraction (0.065 = 6.5%).
    pub risk_free_rate: f64,
    /// Confidence level for VaR/CVaR, strictly between 0 and 1.
    pub var_confidence: f64,
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            var_confidence: DEFAULT_VAR_CONFIDENCE,
        }
    }
}

impl MetricsParams {
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            ..Self::default()
        }
    }

    pub fn with_confidence(self, var_confidence: f64) -> Self {
        Self {
            var_confidence,
            ..self
        }
    }

    fn validate(&self) -> Result<(), AnalyticsError> {
        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::InvalidParameter {
                name: "risk_free_rate",
                reason: format!("{} is not a finite number", self.risk_free_rate),
            });
        }
        if !(self.var_confidence > 0.0 && self.var_confidence < 1.0) {
            return Err(AnalyticsError::InvalidParameter {
                name: "var_confidence",
                reason: format!("{} is not strictly between 0 and 1", self.var_confidence),
            });
        }
        Ok(())
    }
}

/// A stateless calculator for the metrics catalogue.
#[derive(Debug, Default)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// Without a benchmark, tracking error and information ratio are measured
    /// against the series' own mean and beta against a flat market, so the
    /// information ratio and beta come out as `0.0`.
    ///
    /// # Arguments
    ///
    /// * `returns` - The consolidated per-period return series.
    /// * `drawdown` - The drawdown path derived from `returns`.
    /// * `params` - Risk-free rate and VaR confidence.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `MetricsReport` or an `AnalyticsError`.
    pub fn calculate(
        &self,
        returns: &ReturnSeries,
        drawdown: &DrawdownSeries,
        params: &MetricsParams,
    ) -> Result<MetricsReport, AnalyticsError> {
        self.calculate_against(returns, drawdown, None, params)
    }

    /// Like `calculate`, but measures beta, tracking error and information ratio
    /// against `benchmark` over the dates both series share.
    pub fn calculate_against(
        &self,
        returns: &ReturnSeries,
        drawdown: &DrawdownSeries,
        benchmark: Option<&ReturnSeries>,
        params: &MetricsParams,
    ) -> Result<MetricsReport, AnalyticsError> {
        params.validate()?;
        if drawdown.len() != returns.len() {
            return Err(AnalyticsError::LengthMismatch {
                returns: returns.len(),
                drawdown: drawdown.len(),
            });
        }

        let r = returns.values();
        let mut report = MetricsReport::default();

        self.calculate_returns(r, &mut report);
        self.calculate_volatility(r, &mut report);
        self.calculate_drawdown(drawdown.drawdown(), &mut report);
        self.calculate_tail_risk(r, params, &mut report);
        self.calculate_relative(returns, benchmark, &mut report);
        self.calculate_win_loss(r, &mut report);
        self.calculate_ratios(r, params, &mut report);

        tracing::debug!(
            observations = r.len(),
            cagr = report.cagr,
            sharpe = report.sharpe_ratio,
            max_drawdown = report.max_drawdown,
            "Calculated metrics"
        );

        Ok(report)
    }

    /// Total, compound annual, annual and monthly returns.
    fn calculate_returns(&self, r: ArrayView1<f64>, report: &mut MetricsReport) {
        let mean = stats::mean(r);
        report.total_return = stats::total_return(r);
        report.cagr = stats::annualized_growth(report.total_return, r.len());
        report.annual_return = mean * TRADING_DAYS_PER_YEAR as f64;
        report.monthly_return = mean * TRADING_DAYS_PER_MONTH as f64;
    }

    fn calculate_volatility(&self, r: ArrayView1<f64>, report: &mut MetricsReport) {
        let daily = stats::sample_std(r);
        report.daily_volatility = daily;
        report.monthly_volatility = daily * (TRADING_DAYS_PER_MONTH as f64).sqrt();
        report.annual_volatility = daily * (TRADING_DAYS_PER_YEAR as f64).sqrt();
    }

    /// Depth, average, duration and ulcer index of the drawdown path.
    fn calculate_drawdown(&self, dd: ArrayView1<f64>, report: &mut MetricsReport) {
        if dd.is_empty() {
            return;
        }

        report.max_drawdown = dd.fold(f64::INFINITY, |acc, &d| acc.min(d));

        let underwater: Array1<f64> = dd.iter().copied().filter(|&d| d < 0.0).collect();
        report.average_drawdown = stats::mean(underwater.view());

        let runs = underwater_runs(dd);
        if !runs.is_empty() {
            let total: usize = runs.iter().map(|run| run.length).sum();
            report.drawdown_duration = total as f64 / runs.len() as f64;
        }

        report.ulcer_index = stats::mean(dd.mapv(|d| d * d).view()).sqrt();
    }

    /// Empirical VaR/CVaR and the shape of the return distribution.
    fn calculate_tail_risk(
        &self,
        r: ArrayView1<f64>,
        params: &MetricsParams,
        report: &mut MetricsReport,
    ) {
        let var = stats::percentile(r, (1.0 - params.var_confidence) * 100.0);
        let tail: Array1<f64> = r.iter().copied().filter(|&x| x <= var).collect();

        report.value_at_risk = var;
        report.conditional_value_at_risk = stats::mean(tail.view());
        report.skewness = stats::skewness(r);
        report.kurtosis = stats::excess_kurtosis(r);
    }

    /// Tracking error, information ratio and beta.
    fn calculate_relative(
        &self,
        returns: &ReturnSeries,
        benchmark: Option<&ReturnSeries>,
        report: &mut MetricsReport,
    ) {
        match benchmark {
            Some(benchmark) => {
                let (r, b) = benchmark::align(returns, benchmark);
                let active = &r - &b;
                report.tracking_error = benchmark::tracking_error(active.view());
                report.information_ratio = benchmark::information_ratio(active.view());
                report.beta = benchmark::beta(r.view(), b.view());
            }
            None => {
                // The series' own mean stands in for the benchmark, so the
                // active return averages to zero and the market is flat.
                let r = returns.values();
                let mean = stats::mean(r);
                let active = r.mapv(|x| x - mean);
                report.tracking_error = benchmark::tracking_error(active.view());
                report.information_ratio = 0.0;
                report.beta = 0.0;
            }
        }
    }

    /// Profit factor and win rate over individual periods.
    fn calculate_win_loss(&self, r: ArrayView1<f64>, report: &mut MetricsReport) {
        let gains: f64 = r.iter().filter(|&&x| x > 0.0).sum();
        let losses: f64 = r.iter().filter(|&&x| x < 0.0).sum::<f64>().abs();

        report.profit_factor = if losses == 0.0 {
            if gains == 0.0 { 0.0 } else { f64::INFINITY }
        } else {
            gains / losses
        };

        if !r.is_empty() {
            let winners = r.iter().filter(|&&x| x > 0.0).count();
            report.win_rate = winners as f64 / r.len() as f64;
        }
    }

    /// Calculates all ratio-based metrics like Sharpe and Calmar.
    /// Must run after returns, volatility and drawdown are filled in.
    fn calculate_ratios(
        &self,
        r: ArrayView1<f64>,
        params: &MetricsParams,
        report: &mut MetricsReport,
    ) {
        let excess = report.annual_return - params.risk_free_rate;

        // --- Sharpe Ratio ---
        if report.annual_volatility != 0.0 {
            report.sharpe_ratio = excess / report.annual_volatility;
        }

        // --- Sortino Ratio ---
        let downside: Array1<f64> = r.iter().copied().filter(|&x| x < 0.0).collect();
        if !downside.is_empty() {
            let downside_vol =
                stats::sample_std(downside.view()) * (TRADING_DAYS_PER_YEAR as f64).sqrt();
            if downside_vol != 0.0 {
                report.sortino_ratio = excess / downside_vol;
            }
        }

        // --- Calmar Ratio and Recovery Factor ---
        let depth = report.max_drawdown.abs();
        if depth != 0.0 {
            report.calmar_ratio = report.cagr / depth;
            report.recovery_factor = report.total_return / depth;
        } else if report.total_return != 0.0 {
            report.recovery_factor = f64::INFINITY;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawdown::DrawdownTracker;
    use chrono::NaiveDate;

    fn series(values: Vec<f64>) -> ReturnSeries {
        ReturnSeries::daily(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), values)
    }

    fn metrics(values: Vec<f64>, risk_free_rate: f64) -> MetricsReport {
        let returns = series(values);
        let drawdown = DrawdownTracker::new().track(&returns);
        MetricsEngine::new()
            .calculate(&returns, &drawdown, &MetricsParams::new(risk_free_rate))
            .unwrap()
    }

    #[test]
    fn test_up_then_down_scenario() {
        // Prices 100 -> 110 -> 99.
        let report = metrics(vec![0.10, -0.10], 0.0);

        assert!((report.total_return + 0.01).abs() < 1e-12);
        assert!(report.annual_volatility > 0.0);
        assert!(report.sharpe_ratio.is_finite());
        assert!((report.max_drawdown + 0.1).abs() < 1e-12);
        assert!((report.win_rate - 0.5).abs() < 1e-12);
        assert!((report.profit_factor - 1.0).abs() < 1e-9);
        assert_eq!(report.drawdown_duration, 1.0);
        // A single losing period has no downside dispersion.
        assert_eq!(report.sortino_ratio, 0.0);
    }

    #[test]
    fn test_all_positive_returns() {
        let report = metrics(vec![0.01, 0.02, 0.005, 0.03], 0.0);

        assert_eq!(report.sortino_ratio, 0.0);
        assert_eq!(report.profit_factor, f64::INFINITY);
        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.calmar_ratio, 0.0);
        assert_eq!(report.recovery_factor, f64::INFINITY);
        assert_eq!(report.win_rate, 1.0);
    }

    #[test]
    fn test_constant_zero_returns() {
        let report = metrics(vec![0.0; 30], 0.065);

        assert_eq!(report.sharpe_ratio, 0.0);
        assert_eq!(report.sortino_ratio, 0.0);
        assert_eq!(report.calmar_ratio, 0.0);
        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.win_rate, 0.0);
        assert_eq!(report.profit_factor, 0.0);
        assert_eq!(report.recovery_factor, 0.0);
        assert_eq!(report.drawdown_duration, 0.0);
        assert_eq!(report.ulcer_index, 0.0);
        assert_eq!(report.total_return, 0.0);
        assert_eq!(report.cagr, 0.0);
    }

    #[test]
    fn test_cagr_annualizes_over_return_count() {
        // 252 periods of the same return compound to exactly one year.
        let daily = 1.2f64.powf(1.0 / 252.0) - 1.0;
        let report = metrics(vec![daily; 252], 0.0);
        assert!((report.total_return - 0.2).abs() < 1e-9);
        assert!((report.cagr - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_cagr_is_zero_for_single_observation() {
        let report = metrics(vec![0.05], 0.0);
        assert_eq!(report.cagr, 0.0);
        assert_eq!(report.daily_volatility, 0.0);
    }

    #[test]
    fn test_annual_and_monthly_scaling() {
        let report = metrics(vec![0.01, -0.005, 0.002, 0.003], 0.0);
        let mean = (0.01 - 0.005 + 0.002 + 0.003) / 4.0;
        assert!((report.annual_return - mean * 252.0).abs() < 1e-12);
        assert!((report.monthly_return - mean * 21.0).abs() < 1e-12);
        assert!(
            (report.annual_volatility - report.daily_volatility * 252f64.sqrt()).abs() < 1e-12
        );
    }

    #[test]
    fn test_value_at_risk_and_cvar() {
        let values: Vec<f64> = (0..100).map(|i| (i as f64 - 50.0) / 1000.0).collect();
        let report = metrics(values, 0.0);
        // 5th percentile of -0.050..0.049: rank 4.95 -> -0.04505
        assert!((report.value_at_risk + 0.04505).abs() < 1e-9);
        // Mean of -0.050..=-0.046
        assert!((report.conditional_value_at_risk + 0.048).abs() < 1e-9);
        assert!(report.conditional_value_at_risk <= report.value_at_risk);
    }

    #[test]
    fn test_relative_metrics_without_benchmark() {
        let report = metrics(vec![0.01, -0.02, 0.015, 0.005, -0.01], 0.0);
        assert_eq!(report.beta, 0.0);
        assert_eq!(report.information_ratio, 0.0);
        assert!((report.tracking_error - report.annual_volatility).abs() < 1e-12);
    }

    #[test]
    fn test_relative_metrics_with_benchmark() {
        let returns = series(vec![0.02, -0.04, 0.03, 0.01]);
        let market = series(vec![0.01, -0.02, 0.015, 0.005]);
        let drawdown = DrawdownTracker::new().track(&returns);
        let report = MetricsEngine::new()
            .calculate_against(&returns, &drawdown, Some(&market), &MetricsParams::new(0.0))
            .unwrap();

        assert!((report.beta - 2.0 * 4.0 / 3.0).abs() < 1e-9);
        assert!(report.tracking_error > 0.0);
        assert!(report.information_ratio > 0.0);
    }

    #[test]
    fn test_drawdown_duration_averages_runs() {
        // Underwater for 2 periods, recovers, then underwater for 1 period.
        let report = metrics(vec![0.10, -0.05, -0.01, 0.20, -0.02], 0.0);
        assert_eq!(report.drawdown_duration, 1.5);
        assert!(report.average_drawdown < 0.0);
        assert!(report.ulcer_index > 0.0);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let returns = series(vec![0.01, 0.02]);
        let drawdown = DrawdownTracker::new().track(&returns);
        let engine = MetricsEngine::new();

        let bad_rate = MetricsParams::new(f64::NAN);
        assert!(matches!(
            engine.calculate(&returns, &drawdown, &bad_rate),
            Err(AnalyticsError::InvalidParameter { name: "risk_free_rate", .. })
        ));

        let bad_confidence = MetricsParams::default().with_confidence(1.0);
        assert!(engine.calculate(&returns, &drawdown, &bad_confidence).is_err());
    }

    #[test]
    fn test_rejects_mismatched_drawdown() {
        let returns = series(vec![0.01, 0.02, 0.03]);
        let other = DrawdownTracker::new().track(&series(vec![0.01]));
        let err = MetricsEngine::new()
            .calculate(&returns, &other, &MetricsParams::default())
            .unwrap_err();
        assert_eq!(err, AnalyticsError::LengthMismatch { returns: 3, drawdown: 1 });
    }

    #[test]
    fn test_empty_series_yields_sentinels() {
        let report = metrics(Vec::new(), 0.065);
        assert_eq!(report, MetricsReport::default());
    }
}
