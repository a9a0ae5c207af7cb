use analytics::{Metric, MetricsReport};
use analyzer::{Comparison, Side};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::{Overrides, load_config};
use core_types::WeightAssignment;
use market_data::CsvPriceProvider;
use pipeline::{
    AnalysisOptions, AssetReport, PairAnalysis, PipelineError, PortfolioAnalysis,
    PortfolioPipeline,
};
use portfolio::PortfolioInput;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the portfolio-lens application.
fn main() -> Result<()> {
    // A missing .env file is fine; it only supplies optional LENS__* overrides.
    dotenvy::dotenv().ok();

    // Logs go to stderr so that --json output on stdout stays machine-readable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    cli.overrides.apply(&mut config);
    config.validate().context("Invalid command-line override")?;

    let provider = CsvPriceProvider::new(&config.data.prices_path);
    let pipeline = PortfolioPipeline::new(&provider, AnalysisOptions::from(&config));

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(&pipeline, args, cli.json),
        Commands::Compare(args) => handle_compare(&pipeline, args, cli.json),
        Commands::Assets(args) => handle_assets(&pipeline, args, cli.json),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Return and risk analytics for weighted baskets of instruments.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (optional).
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single weighted basket.
    Analyze(AnalyzeArgs),
    /// Analyze two baskets side by side and score them against each other.
    Compare(CompareArgs),
    /// Show the standalone performance and correlation of instruments.
    Assets(AssetsArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Weights as SYMBOL=WEIGHT pairs, e.g. "TCS=60,INFY=40".
    #[arg(long, short, conflicts_with = "symbols")]
    weights: Option<WeightAssignment>,

    /// Symbols to hold in equal weights, e.g. "TCS,INFY,WIPRO".
    #[arg(long, short, value_delimiter = ',')]
    symbols: Vec<String>,
}

#[derive(Parser)]
struct CompareArgs {
    /// Weights of portfolio A as SYMBOL=WEIGHT pairs.
    #[arg(long)]
    a: WeightAssignment,

    /// Weights of portfolio B as SYMBOL=WEIGHT pairs.
    #[arg(long)]
    b: WeightAssignment,
}

#[derive(Parser)]
struct AssetsArgs {
    /// Symbols to report on; every column of the price file when omitted.
    #[arg(long, short, value_delimiter = ',')]
    symbols: Vec<String>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_analyze(pipeline: &PortfolioPipeline, args: AnalyzeArgs, json: bool) -> Result<()> {
    let input = match args.weights {
        Some(weights) => PortfolioInput::from(weights),
        None if !args.symbols.is_empty() => PortfolioInput::equal_weight(&args.symbols),
        None => bail!("Provide either --weights or --symbols"),
    };
    check_allocation("portfolio", &input);

    let analysis = pipeline.analyze(input.weights())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis("Portfolio", &analysis, pipeline.options().initial_investment);
    }
    Ok(())
}

fn handle_compare(pipeline: &PortfolioPipeline, args: CompareArgs, json: bool) -> Result<()> {
    let a = PortfolioInput::from(args.a);
    let b = PortfolioInput::from(args.b);
    check_allocation("A", &a);
    check_allocation("B", &b);

    let pair = pipeline.compare(a.weights(), b.weights());

    if json {
        let output = serde_json::json!({
            "a": side_json(&pair.a)?,
            "b": side_json(&pair.b)?,
            "comparison": pair.comparison,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_pair(&pair, pipeline.options().initial_investment);
    }

    match (&pair.a, &pair.b) {
        (Err(a), Err(b)) => bail!("Both portfolios failed: A: {}; B: {}", a, b),
        _ => Ok(()),
    }
}

fn handle_assets(pipeline: &PortfolioPipeline, args: AssetsArgs, json: bool) -> Result<()> {
    let report = pipeline.assets(&args.symbols)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_assets(&report);
    }
    Ok(())
}

/// The weight entry screen asks for weights that total 100; anything else is
/// accepted and normalized, but worth pointing out.
fn check_allocation(label: &str, input: &PortfolioInput) {
    if !input.is_fully_allocated() {
        tracing::warn!(
            portfolio = label,
            total = input.total(),
            gap = input.allocation_gap(),
            "Weights do not add up to 100, they will be normalized"
        );
    }
}

fn side_json(side: &Result<PortfolioAnalysis, PipelineError>) -> Result<serde_json::Value> {
    Ok(match side {
        Ok(analysis) => serde_json::to_value(analysis)?,
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    })
}

// ==============================================================================
// Table Output
// ==============================================================================

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn print_analysis(title: &str, analysis: &PortfolioAnalysis, initial_investment: f64) {
    println!("=== {} ({}, {} returns) ===", title, analysis.period, analysis.observations);

    let mut composition = new_table();
    composition.set_header(vec!["Symbol", "Weight"]);
    for holding in &analysis.composition {
        composition.add_row(vec![
            holding.symbol.clone(),
            format!("{:.2}%", holding.weight_pct()),
        ]);
    }
    println!("{composition}");
    println!("Concentration index: {:.3}", analysis.concentration);
    if let Some(last) = analysis.value_curve.last() {
        println!(
            "Value of {:.0} invested: {:.2} on {}",
            initial_investment, last.value, last.date
        );
    }

    println!("{}", metrics_table(&analysis.metrics));

    if let Some(benchmark) = &analysis.benchmark {
        println!(
            "Benchmark: beta {:.3}, alpha {:.2}%, correlation {:.3}, tracking error {:.2}%, information ratio {:.3} ({} common dates)",
            benchmark.beta,
            benchmark.alpha * 100.0,
            benchmark.correlation,
            benchmark.tracking_error * 100.0,
            benchmark.information_ratio,
            benchmark.observations
        );
    }
}

fn metrics_table(report: &MetricsReport) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    for (metric, value) in report.iter() {
        table.add_row(vec![metric.label().to_string(), metric.format(value)]);
    }
    table
}

fn print_pair(pair: &PairAnalysis, initial_investment: f64) {
    for (label, side) in [("Portfolio A", &pair.a), ("Portfolio B", &pair.b)] {
        match side {
            Ok(analysis) => print_analysis(label, analysis, initial_investment),
            Err(e) => eprintln!("{} could not be analyzed: {}", label, e),
        }
    }

    if let Some(comparison) = &pair.comparison {
        print_comparison(comparison);
    }
}

fn print_comparison(comparison: &Comparison) {
    let mut table = new_table();
    table.set_header(vec!["Dimension", "A", "B", "Difference", "Better"]);
    for outcome in &comparison.outcomes {
        let metric: Metric = outcome.dimension.metric();
        let better = match outcome.winner {
            Side::A => "A",
            Side::B => "B",
            Side::Tie => "tie",
        };
        table.add_row(vec![
            outcome.dimension.to_string(),
            metric.format(outcome.value_a),
            metric.format(outcome.value_b),
            metric.format(outcome.difference),
            better.to_string(),
        ]);
    }
    println!("{table}");
    println!(
        "Score: A {} / B {} out of {}, winner: {}",
        comparison.score_a,
        comparison.score_b,
        comparison.dimensions(),
        comparison.verdict
    );
    println!("Recommendation: {}", comparison.recommendation);
}

fn print_assets(report: &AssetReport) {
    let mut performance = new_table();
    performance.set_header(vec!["Symbol", "Total Return", "CAGR", "Volatility", "Sharpe"]);
    for row in &report.performance {
        performance.add_row(vec![
            row.symbol.clone(),
            Metric::TotalReturn.format(row.total_return),
            Metric::Cagr.format(row.cagr),
            Metric::AnnualVolatility.format(row.volatility),
            Metric::SharpeRatio.format(row.sharpe_ratio),
        ]);
    }
    println!("{performance}");

    let mut correlation = new_table();
    let mut header = vec![String::new()];
    header.extend(report.correlation.symbols.iter().cloned());
    correlation.set_header(header);
    for (symbol, row) in report.correlation.symbols.iter().zip(&report.correlation.values) {
        let mut cells = vec![symbol.clone()];
        cells.extend(row.iter().map(|rho| format!("{:.2}", rho)));
        correlation.add_row(cells);
    }
    println!("{correlation}");
}
