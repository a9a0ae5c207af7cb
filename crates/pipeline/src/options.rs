use analytics::MetricsParams;
use configuration::Config;
use core_types::Period;

/// Everything the pipeline needs besides the weights and the price source.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub period: Period,
    pub params: MetricsParams,
    pub initial_investment: f64,
    pub rolling_window: usize,
    /// Price column used as the market for beta, tracking error and alpha.
    pub benchmark_symbol: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            period: Period::default(),
            params: MetricsParams::default(),
            initial_investment: 100_000.0,
            rolling_window: 30,
            benchmark_symbol: None,
        }
    }
}

impl From<&Config> for AnalysisOptions {
    fn from(config: &Config) -> Self {
        Self {
            period: config.data.period,
            params: MetricsParams::new(config.analysis.risk_free_rate)
                .with_confidence(config.analysis.var_confidence),
            initial_investment: config.analysis.initial_investment,
            rolling_window: config.analysis.rolling_window,
            benchmark_symbol: config.data.benchmark_symbol.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_carries_every_setting() {
        let mut config = Config::default();
        config.analysis.risk_free_rate = 0.04;
        config.analysis.var_confidence = 0.99;
        config.data.period = Period::ThreeYears;
        config.data.benchmark_symbol = Some("NIFTY".to_string());

        let options = AnalysisOptions::from(&config);
        assert_eq!(options.params.risk_free_rate, 0.04);
        assert_eq!(options.params.var_confidence, 0.99);
        assert_eq!(options.period, Period::ThreeYears);
        assert_eq!(options.benchmark_symbol.as_deref(), Some("NIFTY"));
        assert_eq!(options.rolling_window, 30);
    }
}
