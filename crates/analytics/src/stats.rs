//! Numeric reductions over return arrays.
//!
//! The reduction semantics are fixed here rather than left to defaults, because
//! they change reported values:
//!
//! - standard deviation and covariance use the sample (`n - 1`) denominator,
//! - variance of a reference series uses the population (`n`) denominator,
//! - skewness and kurtosis are the biased (population) moment estimators,
//! - percentiles interpolate linearly between the two nearest order statistics.
//!
//! Reductions over too few observations return `0.0` instead of NaN.

use core_types::TRADING_DAYS_PER_YEAR;
use ndarray::{Array1, ArrayView1, Zip};

/// Arithmetic mean, `0.0` for an empty array.
pub fn mean(x: ArrayView1<f64>) -> f64 {
    x.mean().unwrap_or(0.0)
}

/// Sample standard deviation, `0.0` for fewer than two observations.
pub fn sample_std(x: ArrayView1<f64>) -> f64 {
    if x.len() < 2 {
        return 0.0;
    }
    x.std(1.0)
}

/// Population variance, `0.0` for an empty array.
pub fn population_var(x: ArrayView1<f64>) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.var(0.0)
}

/// Sample covariance of two equally long arrays, `0.0` for fewer than two pairs.
pub fn sample_covariance(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (x.slice(ndarray::s![..n]), y.slice(ndarray::s![..n]));
    let (mx, my) = (mean(x), mean(y));
    let sum = Zip::from(&x)
        .and(&y)
        .fold(0.0, |acc, &a, &b| acc + (a - mx) * (b - my));
    sum / (n - 1) as f64
}

/// Pearson correlation. `0.0` when either side has no variation.
pub fn correlation(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let (sx, sy) = (sample_std(x), sample_std(y));
    if sx == 0.0 || sy == 0.0 {
        return 0.0;
    }
    sample_covariance(x, y) / (sx * sy)
}

/// The `q`-th percentile (`0..=100`) with linear interpolation between order
/// statistics. `0.0` for an empty array.
pub fn percentile(x: ArrayView1<f64>, q: f64) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let mut sorted = x.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let fraction = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * fraction
}

/// Second, third and fourth central moments with the `n` denominator.
fn central_moments(x: ArrayView1<f64>) -> (f64, f64, f64) {
    let n = x.len() as f64;
    let m = mean(x);
    let (m2, m3, m4) = x.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), &v| {
        let d = v - m;
        let d2 = d * d;
        (s2 + d2, s3 + d2 * d, s4 + d2 * d2)
    });
    (m2 / n, m3 / n, m4 / n)
}

/// True when the spread is indistinguishable from rounding noise around the mean.
fn is_degenerate(x: ArrayView1<f64>, m2: f64) -> bool {
    let scale = f64::EPSILON * mean(x).abs();
    m2 <= scale * scale
}

/// Biased sample skewness `m3 / m2^1.5`. `0.0` for constant or empty input.
pub fn skewness(x: ArrayView1<f64>) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let (m2, m3, _) = central_moments(x);
    if is_degenerate(x, m2) {
        return 0.0;
    }
    m3 / m2.powf(1.5)
}

/// Biased excess kurtosis `m4 / m2^2 - 3`. `0.0` for constant or empty input.
pub fn excess_kurtosis(x: ArrayView1<f64>) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let (m2, _, m4) = central_moments(x);
    if is_degenerate(x, m2) {
        return 0.0;
    }
    m4 / (m2 * m2) - 3.0
}

/// Running maximum, `out[t] = max(x[0..=t])`.
pub fn running_max(x: ArrayView1<f64>) -> Array1<f64> {
    let mut peak = f64::NEG_INFINITY;
    x.mapv(|v| {
        peak = peak.max(v);
        peak
    })
}

/// Compounded return path, `out[t] = (1 + x[0]) ... (1 + x[t]) - 1`.
pub fn compound(x: ArrayView1<f64>) -> Array1<f64> {
    let mut wealth = 1.0;
    x.mapv(|r| {
        wealth *= 1.0 + r;
        wealth - 1.0
    })
}

/// Total compounded return of the whole array.
pub fn total_return(x: ArrayView1<f64>) -> f64 {
    x.fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// Constant annual rate reproducing `total_return` over `periods` trading days.
///
/// `0.0` for fewer than two periods; `-1.0` when the basket lost everything,
/// since a fractional power of a non-positive growth factor is undefined.
pub fn annualized_growth(total_return: f64, periods: usize) -> f64 {
    if periods < 2 {
        return 0.0;
    }
    let years = periods as f64 / TRADING_DAYS_PER_YEAR as f64;
    if years <= 0.0 {
        return 0.0;
    }
    let growth = 1.0 + total_return;
    if growth <= 0.0 {
        return -1.0;
    }
    growth.powf(1.0 / years) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_sample_std_uses_n_minus_one() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        assert!(close(sample_std(x.view()), (5.0f64 / 3.0).sqrt()));
        assert_eq!(sample_std(array![1.0].view()), 0.0);
        assert_eq!(sample_std(Array1::<f64>::zeros(0).view()), 0.0);
    }

    #[test]
    fn test_population_var_uses_n() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        assert!(close(population_var(x.view()), 1.25));
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let x = array![4.0, 1.0, 3.0, 2.0, 5.0];
        assert!(close(percentile(x.view(), 0.0), 1.0));
        assert!(close(percentile(x.view(), 50.0), 3.0));
        assert!(close(percentile(x.view(), 100.0), 5.0));
        // rank = 0.05 * 4 = 0.2 -> 1 + 0.2 * (2 - 1)
        assert!(close(percentile(x.view(), 5.0), 1.2));
    }

    #[test]
    fn test_sample_covariance_and_correlation() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![2.0, 4.0, 6.0];
        assert!(close(sample_covariance(x.view(), y.view()), 2.0));
        assert!(close(correlation(x.view(), y.view()), 1.0));
        assert_eq!(correlation(x.view(), array![1.0, 1.0, 1.0].view()), 0.0);
    }

    #[test]
    fn test_moments_of_symmetric_sample() {
        let x = array![-2.0, -1.0, 0.0, 1.0, 2.0];
        assert!(close(skewness(x.view()), 0.0));
        // m2 = 2, m4 = 6.8 -> 6.8 / 4 - 3
        assert!(close(excess_kurtosis(x.view()), -1.3));
    }

    #[test]
    fn test_moments_of_constant_sample_are_zero() {
        let x = array![0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1];
        assert_eq!(skewness(x.view()), 0.0);
        assert_eq!(excess_kurtosis(x.view()), 0.0);
    }

    #[test]
    fn test_moments_of_two_points_are_not_degenerate() {
        let x = array![0.01, -0.01];
        assert!(close(skewness(x.view()), 0.0));
        assert!(close(excess_kurtosis(x.view()), -2.0));
    }

    #[test]
    fn test_right_skewed_sample_is_positive() {
        let x = array![0.0, 0.0, 0.0, 0.0, 10.0];
        assert!(skewness(x.view()) > 0.0);
    }

    #[test]
    fn test_running_max_and_compound() {
        let r = array![0.10, -0.10, 0.05];
        let cumulative = compound(r.view());
        assert!(close(cumulative[1], 1.1 * 0.9 - 1.0));
        assert!(close(cumulative[2], 1.1 * 0.9 * 1.05 - 1.0));
        assert_eq!(running_max(array![1.0, 3.0, 2.0, 4.0].view()), array![1.0, 3.0, 3.0, 4.0]);
        assert!(close(total_return(r.view()), cumulative[2]));
    }

    #[test]
    fn test_annualized_growth() {
        // Two years of 10% a year.
        assert!(close(annualized_growth(0.21, 504), 0.10));
        assert_eq!(annualized_growth(0.5, 1), 0.0);
        assert_eq!(annualized_growth(-1.0, 300), -1.0);
    }
}
