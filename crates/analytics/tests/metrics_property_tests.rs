//! Property-based tests for the drawdown tracker and the metrics engine.

use analytics::{DrawdownTracker, MetricsEngine, MetricsParams, stats};
use chrono::NaiveDate;
use core_types::ReturnSeries;
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

/// Daily returns between -20% and +20%, 1..120 observations.
fn arb_returns() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-0.2f64..0.2, 1..120)
}

fn series(values: Vec<f64>) -> ReturnSeries {
    ReturnSeries::daily(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(), values)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn total_return_matches_compounded_product(values in arb_returns()) {
        let product: f64 = values.iter().map(|r| 1.0 + r).product();
        let returns = series(values);
        let drawdown = DrawdownTracker::new().track(&returns);
        let report = MetricsEngine::new()
            .calculate(&returns, &drawdown, &MetricsParams::default())
            .unwrap();

        prop_assert!((1.0 + report.total_return - product).abs() < 1e-9);
    }

    #[test]
    fn drawdown_is_non_positive_and_zero_at_peaks(values in arb_returns()) {
        let dd = DrawdownTracker::new().track(&series(values));
        let peaks = stats::running_max(dd.cumulative());

        for ((&d, &c), &peak) in dd.drawdown().iter().zip(dd.cumulative().iter()).zip(peaks.iter()) {
            prop_assert!(d <= 0.0);
            prop_assert!(d > -1.0);
            if c == peak {
                prop_assert_eq!(d, 0.0);
            }
        }
    }

    #[test]
    fn cvar_never_exceeds_var(values in arb_returns(), confidence in 0.5f64..0.99) {
        let returns = series(values);
        let drawdown = DrawdownTracker::new().track(&returns);
        let params = MetricsParams::new(0.0).with_confidence(confidence);
        let report = MetricsEngine::new().calculate(&returns, &drawdown, &params).unwrap();

        prop_assert!(report.conditional_value_at_risk <= report.value_at_risk + 1e-15);
    }

    #[test]
    fn bounded_metrics_stay_in_range(values in arb_returns()) {
        let returns = series(values);
        let drawdown = DrawdownTracker::new().track(&returns);
        let report = MetricsEngine::new()
            .calculate(&returns, &drawdown, &MetricsParams::default())
            .unwrap();

        prop_assert!((0.0..=1.0).contains(&report.win_rate));
        prop_assert!(report.max_drawdown <= report.average_drawdown + 1e-12);
        prop_assert!(report.ulcer_index >= 0.0);
        prop_assert!(report.annual_volatility >= 0.0);
        prop_assert!(report.profit_factor >= 0.0);
        prop_assert!(report.iter().all(|(_, value)| !value.is_nan()));
    }
}
