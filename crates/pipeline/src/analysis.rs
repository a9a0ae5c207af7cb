use crate::error::PipelineError;
use crate::options::AnalysisOptions;
use analytics::{
    AssetPerformance, BenchmarkComparison, CorrelationMatrix, DrawdownTracker, MetricsEngine,
    MetricsReport, asset_performance, compare_to_benchmark, concentration_index,
    correlation_matrix, matched_returns, rolling_volatility,
};
use analyzer::{Comparator, Comparison};
use core_types::{Holding, Period, PriceMatrix, SeriesPoint, WeightAssignment};
use market_data::PriceProvider;
use portfolio::{ReturnBuilder, simple_returns};
use serde::Serialize;

/// The complete result for one basket. Either all of it is produced or the
/// analysis fails as a whole.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioAnalysis {
    pub period: Period,
    /// Number of return observations.
    pub observations: usize,
    /// Holdings by weight, largest first.
    pub composition: Vec<Holding>,
    /// Normalized Herfindahl index of the weights.
    pub concentration: f64,
    pub metrics: MetricsReport,
    pub benchmark: Option<BenchmarkComparison>,
    pub daily_returns: Vec<SeriesPoint>,
    pub cumulative_returns: Vec<SeriesPoint>,
    pub drawdown: Vec<SeriesPoint>,
    pub value_curve: Vec<SeriesPoint>,
    pub rolling_volatility: Vec<SeriesPoint>,
}

/// Two independently analyzed baskets and, when both succeeded, their comparison.
#[derive(Debug)]
pub struct PairAnalysis {
    pub a: Result<PortfolioAnalysis, PipelineError>,
    pub b: Result<PortfolioAnalysis, PipelineError>,
    pub comparison: Option<Comparison>,
}

/// Standalone diagnostics for a set of instruments.
#[derive(Debug, Clone, Serialize)]
pub struct AssetReport {
    pub performance: Vec<AssetPerformance>,
    pub correlation: CorrelationMatrix,
}

/// Fetches prices and runs every analysis stage for a weight assignment.
pub struct PortfolioPipeline<'a> {
    provider: &'a dyn PriceProvider,
    options: AnalysisOptions,
}

impl<'a> PortfolioPipeline<'a> {
    pub fn new(provider: &'a dyn PriceProvider, options: AnalysisOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Analyzes a single basket.
    pub fn analyze(&self, assignment: &WeightAssignment) -> Result<PortfolioAnalysis, PipelineError> {
        let benchmark = self.benchmark_prices();
        self.analyze_with(assignment, benchmark.as_ref())
    }

    /// Analyzes two baskets in parallel. A failure on one side does not affect
    /// the other; the comparison is only produced when both succeed.
    #[tracing::instrument(skip_all)]
    pub fn compare(&self, a: &WeightAssignment, b: &WeightAssignment) -> PairAnalysis {
        let benchmark = self.benchmark_prices();
        let benchmark = benchmark.as_ref();

        let (a, b) = rayon::join(
            || self.analyze_with(a, benchmark),
            || self.analyze_with(b, benchmark),
        );

        let comparison = match (&a, &b) {
            (Ok(a), Ok(b)) => Some(Comparator::new().compare(&a.metrics, &b.metrics)),
            _ => None,
        };

        PairAnalysis { a, b, comparison }
    }

    /// Per-instrument performance and correlation for `symbols`.
    #[tracing::instrument(skip(self), fields(period = %self.options.period))]
    pub fn assets(&self, symbols: &[String]) -> Result<AssetReport, PipelineError> {
        let prices = self.provider.fetch(symbols, self.options.period)?;
        let returns = simple_returns(&prices)?;

        Ok(AssetReport {
            performance: asset_performance(&returns, self.options.params.risk_free_rate),
            correlation: correlation_matrix(&returns),
        })
    }

    #[tracing::instrument(
        skip_all,
        fields(symbols = %assignment.symbols().join(","), period = %self.options.period)
    )]
    fn analyze_with(
        &self,
        assignment: &WeightAssignment,
        benchmark: Option<&(String, PriceMatrix)>,
    ) -> Result<PortfolioAnalysis, PipelineError> {
        // 1. Fetch
        let prices = self
            .provider
            .fetch(&assignment.symbols(), self.options.period)?;

        // 2. Blend
        let portfolio = ReturnBuilder::new().build(&prices, assignment)?;
        let returns = portfolio.returns();
        // Benchmark returns over the same price intervals as the basket's.
        let benchmark =
            benchmark.and_then(|(symbol, bench)| matched_returns(prices.dates(), bench, symbol));

        // 3. Measure
        let drawdown = DrawdownTracker::new().track(returns);
        let metrics = MetricsEngine::new().calculate_against(
            returns,
            &drawdown,
            benchmark.as_ref(),
            &self.options.params,
        )?;
        let benchmark = benchmark
            .as_ref()
            .map(|b| compare_to_benchmark(returns, b, self.options.params.risk_free_rate));

        let weights: Vec<f64> = portfolio.weights().holdings().iter().map(|h| h.weight).collect();
        let rolling = rolling_volatility(returns, self.options.rolling_window)?;

        tracing::info!(
            observations = returns.len(),
            total_return = metrics.total_return,
            sharpe = metrics.sharpe_ratio,
            "Portfolio analyzed"
        );

        Ok(PortfolioAnalysis {
            period: self.options.period,
            observations: returns.len(),
            composition: portfolio.composition(),
            concentration: concentration_index(&weights),
            metrics,
            benchmark,
            daily_returns: returns.points(),
            cumulative_returns: drawdown.cumulative_points(),
            drawdown: drawdown.drawdown_points(),
            value_curve: drawdown.value_curve(self.options.initial_investment),
            rolling_volatility: rolling,
        })
    }

    /// The benchmark's prices, or `None` when none is configured or they
    /// cannot be loaded. A missing benchmark only degrades the relative metrics.
    fn benchmark_prices(&self) -> Option<(String, PriceMatrix)> {
        let symbol = self.options.benchmark_symbol.as_ref()?;
        match self
            .provider
            .fetch(std::slice::from_ref(symbol), self.options.period)
        {
            Ok(prices) if prices.column(symbol).is_some() => Some((symbol.clone(), prices)),
            Ok(_) => {
                tracing::warn!(%symbol, "Benchmark not found, relative metrics use defaults");
                None
            }
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "Benchmark unavailable, relative metrics use defaults");
                None
            }
        }
    }
}
