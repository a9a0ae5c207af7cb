use crate::error::ConfigError;
use core_types::Period;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub data: DataSettings,
}

/// Parameters for the metrics calculation and its presentation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Annual risk-free rate as a fraction. 0.065 corresponds to 6.5%.
    pub risk_free_rate: f64,
    /// Confidence level for Value at Risk. 0.95 looks at the worst 5% of days.
    pub var_confidence: f64,
    /// Starting capital for the portfolio value curve.
    pub initial_investment: f64,
    /// Number of trailing returns per rolling-volatility point.
    pub rolling_window: usize,
}

/// Where prices come from and how much history to use.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// CSV file with a `date` column followed by one close-price column per symbol.
    pub prices_path: PathBuf,
    /// Trailing look-back window ("1y", "3y", "5y" or "10y").
    pub period: Period,
    /// Column used as the market benchmark for beta, tracking error and alpha.
    pub benchmark_symbol: Option<String>,
}

// --- Default Implementations ---
// This allows a user to omit any section or key from their toml
// and still have it work with sensible defaults.

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.065,
            var_confidence: 0.95,
            initial_investment: 100_000.0,
            rolling_window: 30,
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            prices_path: PathBuf::from("data/sample_prices.csv"),
            period: Period::default(),
            benchmark_symbol: None,
        }
    }
}

impl Config {
    /// Checks the loaded values for anything the analysis cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analysis;

        if !a.risk_free_rate.is_finite() || a.risk_free_rate <= -1.0 {
            return Err(ConfigError::ValidationError(format!(
                "analysis.risk_free_rate must be a finite rate above -100%, got {}",
                a.risk_free_rate
            )));
        }
        if !(a.var_confidence > 0.0 && a.var_confidence < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "analysis.var_confidence must lie strictly between 0 and 1, got {}",
                a.var_confidence
            )));
        }
        if !a.initial_investment.is_finite() || a.initial_investment <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "analysis.initial_investment must be positive, got {}",
                a.initial_investment
            )));
        }
        if a.rolling_window < 2 {
            return Err(ConfigError::ValidationError(format!(
                "analysis.rolling_window must cover at least 2 returns, got {}",
                a.rolling_window
            )));
        }
        if self.data.prices_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.prices_path must not be empty".to_string(),
            ));
        }
        if let Some(symbol) = &self.data.benchmark_symbol {
            if symbol.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "data.benchmark_symbol must not be blank".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.risk_free_rate, 0.065);
        assert_eq!(config.analysis.rolling_window, 30);
        assert_eq!(config.data.period, Period::OneYear);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut config = Config::default();
        config.analysis.var_confidence = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = Config::default();
        config.analysis.risk_free_rate = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.initial_investment = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.rolling_window = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.data.benchmark_symbol = Some("  ".to_string());
        assert!(config.validate().is_err());
    }
}
