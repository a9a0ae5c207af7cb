use serde::{Deserialize, Serialize};
use std::fmt;

/// How a metric's value should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    /// A fraction, usually shown as a percentage (0.12 = 12%).
    Rate,
    /// A dimensionless ratio.
    Ratio,
    /// A count of trading periods (days).
    Periods,
}

/// The closed catalogue of metrics reported for every portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    TotalReturn,
    Cagr,
    AnnualReturn,
    MonthlyReturn,
    DailyVolatility,
    MonthlyVolatility,
    AnnualVolatility,
    SharpeRatio,
    SortinoRatio,
    InformationRatio,
    TrackingError,
    CalmarRatio,
    MaxDrawdown,
    AverageDrawdown,
    DrawdownDuration,
    UlcerIndex,
    ValueAtRisk,
    ConditionalValueAtRisk,
    Skewness,
    Kurtosis,
    Beta,
    RecoveryFactor,
    ProfitFactor,
    WinRate,
}

impl Metric {
    pub const ALL: [Metric; 24] = [
        Metric::TotalReturn,
        Metric::Cagr,
        Metric::AnnualReturn,
        Metric::MonthlyReturn,
        Metric::DailyVolatility,
        Metric::MonthlyVolatility,
        Metric::AnnualVolatility,
        Metric::SharpeRatio,
        Metric::SortinoRatio,
        Metric::InformationRatio,
        Metric::TrackingError,
        Metric::CalmarRatio,
        Metric::MaxDrawdown,
        Metric::AverageDrawdown,
        Metric::DrawdownDuration,
        Metric::UlcerIndex,
        Metric::ValueAtRisk,
        Metric::ConditionalValueAtRisk,
        Metric::Skewness,
        Metric::Kurtosis,
        Metric::Beta,
        Metric::RecoveryFactor,
        Metric::ProfitFactor,
        Metric::WinRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::TotalReturn => "Total Return",
            Metric::Cagr => "CAGR",
            Metric::AnnualReturn => "Annual Return",
            Metric::MonthlyReturn => "Monthly Return",
            Metric::DailyVolatility => "Daily Volatility",
            Metric::MonthlyVolatility => "Monthly Volatility",
            Metric::AnnualVolatility => "Annual Volatility",
            Metric::SharpeRatio => "Sharpe Ratio",
            Metric::SortinoRatio => "Sortino Ratio",
            Metric::InformationRatio => "Information Ratio",
            Metric::TrackingError => "Tracking Error",
            Metric::CalmarRatio => "Calmar Ratio",
            Metric::MaxDrawdown => "Max Drawdown",
            Metric::AverageDrawdown => "Average Drawdown",
            Metric::DrawdownDuration => "Drawdown Duration",
            Metric::UlcerIndex => "Ulcer Index",
            Metric::ValueAtRisk => "Value at Risk",
            Metric::ConditionalValueAtRisk => "Conditional Value at Risk",
            Metric::Skewness => "Skewness",
            Metric::Kurtosis => "Kurtosis",
            Metric::Beta => "Beta",
            Metric::RecoveryFactor => "Recovery Factor",
            Metric::ProfitFactor => "Profit Factor",
            Metric::WinRate => "Win Rate",
        }
    }

    pub fn unit(&self) -> MetricUnit {
        match self {
            Metric::DrawdownDuration => MetricUnit::Periods,
            Metric::SharpeRatio
            | Metric::SortinoRatio
            | Metric::InformationRatio
            | Metric::CalmarRatio
            | Metric::Skewness
            | Metric::Kurtosis
            | Metric::Beta
            | Metric::RecoveryFactor
            | Metric::ProfitFactor => MetricUnit::Ratio,
            _ => MetricUnit::Rate,
        }
    }

    /// Renders `value` for display according to the metric's unit.
    pub fn format(&self, value: f64) -> String {
        if value.is_infinite() {
            return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
        }
        match self.unit() {
            MetricUnit::Rate => format!("{:.2}%", value * 100.0),
            MetricUnit::Ratio => format!("{:.3}", value),
            MetricUnit::Periods => format!("{:.1} days", value),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The full metrics catalogue for one portfolio.
///
/// This struct is the final output of the `MetricsEngine` and the input of the
/// comparator. Every field is always populated; degenerate inputs produce the
/// documented sentinels rather than missing values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsReport {
    // I. Returns
    pub total_return: f64,
    pub cagr: f64,
    pub annual_return: f64,
    pub monthly_return: f64,

    // II. Volatility
    pub daily_volatility: f64,
    pub monthly_volatility: f64,
    pub annual_volatility: f64,

    // III. Risk-adjusted ratios
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64, // 0 when there are no losing periods
    pub information_ratio: f64,
    pub tracking_error: f64,
    pub calmar_ratio: f64, // 0 when there is no drawdown

    // IV. Drawdown
    pub max_drawdown: f64,
    pub average_drawdown: f64,
    pub drawdown_duration: f64, // mean underwater run, in periods
    pub ulcer_index: f64,

    // V. Distribution and tail risk
    pub value_at_risk: f64,
    pub conditional_value_at_risk: f64,
    pub skewness: f64,
    pub kurtosis: f64, // excess
    pub beta: f64,

    // VI. Win/loss
    pub recovery_factor: f64, // can be infinite
    pub profit_factor: f64,   // can be infinite
    pub win_rate: f64,
}

impl MetricsReport {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalReturn => self.total_return,
            Metric::Cagr => self.cagr,
            Metric::AnnualReturn => self.annual_return,
            Metric::MonthlyReturn => self.monthly_return,
            Metric::DailyVolatility => self.daily_volatility,
            Metric::MonthlyVolatility => self.monthly_volatility,
            Metric::AnnualVolatility => self.annual_volatility,
            Metric::SharpeRatio => self.sharpe_ratio,
            Metric::SortinoRatio => self.sortino_ratio,
            Metric::InformationRatio => self.information_ratio,
            Metric::TrackingError => self.tracking_error,
            Metric::CalmarRatio => self.calmar_ratio,
            Metric::MaxDrawdown => self.max_drawdown,
            Metric::AverageDrawdown => self.average_drawdown,
            Metric::DrawdownDuration => self.drawdown_duration,
            Metric::UlcerIndex => self.ulcer_index,
            Metric::ValueAtRisk => self.value_at_risk,
            Metric::ConditionalValueAtRisk => self.conditional_value_at_risk,
            Metric::Skewness => self.skewness,
            Metric::Kurtosis => self.kurtosis,
            Metric::Beta => self.beta,
            Metric::RecoveryFactor => self.recovery_factor,
            Metric::ProfitFactor => self.profit_factor,
            Metric::WinRate => self.win_rate,
        }
    }

    /// Every metric with its value, in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}
