use crate::settings::Config;
use core_types::Period;
use std::path::PathBuf;

/// Command-line values that take precedence over the file and environment.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Overrides {
    /// Annual risk-free rate as a fraction (e.g. 0.065 for 6.5%).
    #[arg(long, global = true)]
    pub risk_free_rate: Option<f64>,

    /// Look-back window: 1y, 3y, 5y or 10y.
    #[arg(long, global = true)]
    pub period: Option<Period>,

    /// CSV file with a `date` column and one close-price column per symbol.
    #[arg(long, global = true)]
    pub prices: Option<PathBuf>,

    /// Price column to use as the market benchmark.
    #[arg(long, global = true)]
    pub benchmark: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(rate) = self.risk_free_rate {
            config.analysis.risk_free_rate = rate;
        }
        if let Some(period) = self.period {
            config.data.period = period;
        }
        if let Some(path) = &self.prices {
            config.data.prices_path = path.clone();
        }
        if let Some(symbol) = &self.benchmark {
            config.data.benchmark_symbol = Some(symbol.clone());
        }
    }
}
