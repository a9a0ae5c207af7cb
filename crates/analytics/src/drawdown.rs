use crate::stats;
use chrono::NaiveDate;
use core_types::{ReturnSeries, SeriesPoint};
use ndarray::{Array1, ArrayView1, Zip};
use serde::Serialize;

/// Cumulative return and peak-relative drawdown for one return series.
///
/// `drawdown[t] = (cumulative[t] - peak[t]) / (1 + peak[t])` where `peak[t]` is the
/// running maximum of `cumulative[0..=t]`. Dividing by the peak wealth multiple
/// keeps every value in `(-1, 0]`, with exactly `0.0` at each new high.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownSeries {
    dates: Vec<NaiveDate>,
    cumulative: Array1<f64>,
    drawdown: Array1<f64>,
}

impl DrawdownSeries {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn cumulative(&self) -> ArrayView1<'_, f64> {
        self.cumulative.view()
    }

    pub fn drawdown(&self) -> ArrayView1<'_, f64> {
        self.drawdown.view()
    }

    pub fn len(&self) -> usize {
        self.drawdown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawdown.is_empty()
    }

    /// Deepest drawdown, `0.0` for an empty series.
    pub fn max_drawdown(&self) -> f64 {
        if self.drawdown.is_empty() {
            return 0.0;
        }
        self.drawdown.fold(f64::INFINITY, |acc, &d| acc.min(d))
    }

    pub fn cumulative_points(&self) -> Vec<SeriesPoint> {
        points(&self.dates, self.cumulative.view())
    }

    pub fn drawdown_points(&self) -> Vec<SeriesPoint> {
        points(&self.dates, self.drawdown.view())
    }

    /// Value of `initial_investment` compounded along the series.
    pub fn value_curve(&self, initial_investment: f64) -> Vec<SeriesPoint> {
        let values = self.cumulative.mapv(|c| initial_investment * (1.0 + c));
        points(&self.dates, values.view())
    }
}

fn points(dates: &[NaiveDate], values: ArrayView1<f64>) -> Vec<SeriesPoint> {
    dates
        .iter()
        .zip(values.iter())
        .map(|(&date, &value)| SeriesPoint { date, value })
        .collect()
}

/// A stateless calculator for the cumulative-return and drawdown paths.
#[derive(Debug, Default)]
pub struct DrawdownTracker {}

impl DrawdownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compounds `returns` and measures each point against the running peak.
    /// Only observations up to `t` are used for the value at `t`.
    pub fn track(&self, returns: &ReturnSeries) -> DrawdownSeries {
        let cumulative = stats::compound(returns.values());
        let peaks = stats::running_max(cumulative.view());

        let drawdown = Zip::from(&cumulative)
            .and(&peaks)
            .map_collect(|&value, &peak| {
                let peak_wealth = 1.0 + peak;
                if peak_wealth > 0.0 {
                    (value - peak) / peak_wealth
                } else {
                    0.0
                }
            });

        DrawdownSeries {
            dates: returns.dates().to_vec(),
            cumulative,
            drawdown,
        }
    }
}

/// A maximal stretch of consecutive observations below the running peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawdownRun {
    /// Index of the first underwater observation.
    pub start: usize,
    /// Number of consecutive underwater observations.
    pub length: usize,
    /// Deepest drawdown reached during the run.
    pub depth: f64,
}

/// Splits a drawdown path into maximal runs of strictly negative values.
///
/// A single left-to-right scan: a run opens on the first negative value after a
/// non-negative one (or at index 0) and closes on the next non-negative value or
/// the end of the series. A series that starts underwater therefore opens its
/// first run at index 0.
pub fn underwater_runs(drawdown: ArrayView1<f64>) -> Vec<DrawdownRun> {
    let mut runs = Vec::new();
    let mut current: Option<DrawdownRun> = None;

    for (idx, &value) in drawdown.iter().enumerate() {
        if value < 0.0 {
            let run = current.get_or_insert(DrawdownRun {
                start: idx,
                length: 0,
                depth: 0.0,
            });
            run.length += 1;
            run.depth = run.depth.min(value);
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    runs.extend(current);
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn series(values: Vec<f64>) -> ReturnSeries {
        ReturnSeries::daily(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), values)
    }

    #[test]
    fn test_track_known_path() {
        let dd = DrawdownTracker::new().track(&series(vec![0.10, -0.10]));

        assert!((dd.cumulative()[0] - 0.10).abs() < 1e-12);
        assert!((dd.cumulative()[1] + 0.01).abs() < 1e-12);
        assert_eq!(dd.drawdown()[0], 0.0);
        // (-0.01 - 0.10) / 1.10
        assert!((dd.drawdown()[1] + 0.1).abs() < 1e-12);
        assert!(dd.max_drawdown() < 0.0);
    }

    #[test]
    fn test_drawdown_is_zero_at_new_highs() {
        let dd = DrawdownTracker::new().track(&series(vec![0.05, -0.02, 0.04, 0.01, -0.03]));
        let values = dd.drawdown();

        assert_eq!(values[0], 0.0);
        assert!(values[1] < 0.0);
        assert_eq!(values[2], 0.0);
        assert_eq!(values[3], 0.0);
        assert!(values[4] < 0.0);
    }

    #[test]
    fn test_drawdown_stays_above_minus_one_after_large_gains() {
        let dd = DrawdownTracker::new().track(&series(vec![3.0, 1.0, -0.9]));
        assert!(dd.drawdown().iter().all(|&d| d > -1.0 && d <= 0.0));
        assert!((dd.max_drawdown() + 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series() {
        let dd = DrawdownTracker::new().track(&series(Vec::new()));
        assert!(dd.is_empty());
        assert_eq!(dd.max_drawdown(), 0.0);
    }

    #[test]
    fn test_value_curve_scales_initial_investment() {
        let dd = DrawdownTracker::new().track(&series(vec![0.10, -0.10]));
        let curve = dd.value_curve(100_000.0);
        assert!((curve[0].value - 110_000.0).abs() < 1e-6);
        assert!((curve[1].value - 99_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_underwater_runs() {
        let runs = underwater_runs(array![0.0, -0.1, -0.2, 0.0, -0.05, 0.0].view());
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].length), (1, 2));
        assert_eq!(runs[0].depth, -0.2);
        assert_eq!((runs[1].start, runs[1].length), (4, 1));
    }

    #[test]
    fn test_underwater_run_at_start_and_end_counts() {
        let runs = underwater_runs(array![-0.1, -0.1, 0.0, -0.3].view());
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].length), (0, 2));
        assert_eq!((runs[1].start, runs[1].length), (3, 1));
    }

    #[test]
    fn test_no_underwater_runs() {
        assert!(underwater_runs(array![0.0, 0.0].view()).is_empty());
    }
}
