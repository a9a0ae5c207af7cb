//! Property-based tests for the end-to-end analysis of a basket.

use analytics::{DrawdownTracker, MetricsEngine};
use chrono::NaiveDate;
use core_types::{PriceMatrix, WeightAssignment};
use market_data::MemoryPriceProvider;
use pipeline::{AnalysisOptions, PortfolioPipeline};
use portfolio::simple_returns;
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

/// A positive price path of 2..80 observations.
fn arb_prices() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(5.0f64..500.0, 2..80)
}

fn matrix(columns: Vec<(&str, Vec<f64>)>) -> PriceMatrix {
    let rows = columns[0].1.len();
    let dates = NaiveDate::from_ymd_opt(2022, 3, 1)
        .unwrap()
        .iter_days()
        .take(rows)
        .collect();
    PriceMatrix::from_columns(dates, columns).unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn single_instrument_basket_matches_the_instrument(
        prices in arb_prices(),
        weight in 1.0f64..100.0,
    ) {
        let other: Vec<f64> = prices.iter().rev().copied().collect();
        let matrix = matrix(vec![("ONLY", prices), ("OTHER", other)]);
        let provider = MemoryPriceProvider::new(matrix.clone());
        let options = AnalysisOptions::default();

        let analysis = PortfolioPipeline::new(&provider, options.clone())
            .analyze(&WeightAssignment::from_pairs([("ONLY", weight)]))
            .unwrap();

        let direct = simple_returns(&matrix).unwrap().series("ONLY").unwrap();
        let drawdown = DrawdownTracker::new().track(&direct);
        let expected = MetricsEngine::new().calculate(&direct, &drawdown, &options.params).unwrap();

        for ((metric, got), (_, want)) in analysis.metrics.iter().zip(expected.iter()) {
            prop_assert!(
                got == want || (got - want).abs() < 1e-9,
                "{} differs: {} vs {}", metric, got, want
            );
        }
    }

    #[test]
    fn composition_and_value_curve_are_consistent(
        prices_a in arb_prices(),
        weight_a in 1.0f64..100.0,
        weight_b in 1.0f64..100.0,
    ) {
        let prices_b: Vec<f64> = prices_a.iter().map(|p| p * 1.5 + 1.0).collect();
        let provider = MemoryPriceProvider::new(matrix(vec![("A", prices_a), ("B", prices_b)]));
        let options = AnalysisOptions::default();
        let initial = options.initial_investment;

        let analysis = PortfolioPipeline::new(&provider, options)
            .analyze(&WeightAssignment::from_pairs([("A", weight_a), ("B", weight_b)]))
            .unwrap();

        let total: f64 = analysis.composition.iter().map(|h| h.weight).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        prop_assert!(analysis.composition.windows(2).all(|w| w[0].weight >= w[1].weight));

        let last = analysis.value_curve.last().unwrap().value;
        prop_assert!((last - initial * (1.0 + analysis.metrics.total_return)).abs() < 1e-6);
    }
}
