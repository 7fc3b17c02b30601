//! Numeric primitives over `f64` series.
//!
//! Every function is total: empty or too-short input yields the neutral value
//! (0.0) and zero denominators short-circuit to 0.0 instead of NaN/Inf.

use serde::{Deserialize, Serialize};

/// Arithmetic mean; 0.0 for an empty series
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Median of a sorted copy; even lengths average the two middle elements
pub fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Population standard deviation (divides by N); 0.0 below two samples
pub fn std_dev(xs: &[f64]) -> f64 {
    if xs.len() < 2 || is_constant(xs) {
        return 0.0;
    }
    let m = mean(xs);
    let variance = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
    variance.sqrt()
}

fn is_constant(xs: &[f64]) -> bool {
    xs.windows(2).all(|w| w[0] == w[1])
}

/// Volatility is the population standard deviation
pub fn volatility(xs: &[f64]) -> f64 {
    std_dev(xs)
}

pub fn min(xs: &[f64]) -> f64 {
    xs.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

pub fn max(xs: &[f64]) -> f64 {
    xs.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Sums needed for regressing `ys` on the index sequence 0..N-1
struct IndexSums {
    n: f64,
    sum_x: f64,
    sum_y: f64,
    sum_xy: f64,
    sum_xx: f64,
    sum_yy: f64,
}

impl IndexSums {
    fn new(ys: &[f64]) -> Self {
        let mut sums = IndexSums {
            n: ys.len() as f64,
            sum_x: 0.0,
            sum_y: 0.0,
            sum_xy: 0.0,
            sum_xx: 0.0,
            sum_yy: 0.0,
        };
        for (i, y) in ys.iter().enumerate() {
            let x = i as f64;
            sums.sum_x += x;
            sums.sum_y += y;
            sums.sum_xy += x * y;
            sums.sum_xx += x * x;
            sums.sum_yy += y * y;
        }
        sums
    }

    fn covariance_term(&self) -> f64 {
        self.n * self.sum_xy - self.sum_x * self.sum_y
    }

    fn x_term(&self) -> f64 {
        self.n * self.sum_xx - self.sum_x * self.sum_x
    }

    fn y_term(&self) -> f64 {
        self.n * self.sum_yy - self.sum_y * self.sum_y
    }
}

/// Ordinary least squares slope of `xs` against its index
pub fn linear_trend(xs: &[f64]) -> f64 {
    if xs.len() < 2 || is_constant(xs) {
        return 0.0;
    }
    let sums = IndexSums::new(xs);
    let denominator = sums.x_term();
    if denominator == 0.0 {
        return 0.0;
    }
    sums.covariance_term() / denominator
}

/// Pearson correlation of `xs` against its index
pub fn correlation(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let sums = IndexSums::new(xs);
    let y_term = sums.y_term();
    // Rounding leaves a constant series with a y term near zero rather than exactly zero
    if y_term <= 1e-12 * sums.n * sums.sum_yy {
        return 0.0;
    }
    let product = sums.x_term() * y_term;
    if product <= 0.0 {
        return 0.0;
    }
    (sums.covariance_term() / product.sqrt()).clamp(-1.0, 1.0)
}

/// Summary statistics for one series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

pub fn describe(xs: &[f64]) -> DescriptiveStats {
    let min = min(xs);
    let max = max(xs);
    DescriptiveStats {
        count: xs.len(),
        mean: mean(xs),
        median: median(xs),
        std_dev: std_dev(xs),
        min,
        max,
        range: max - min,
    }
}

/// Trend, correlation and volatility of one series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct TrendStats {
    pub slope: f64,
    pub correlation: f64,
    pub volatility: f64,
}

pub fn trend_stats(xs: &[f64]) -> TrendStats {
    TrendStats {
        slope: linear_trend(xs),
        correlation: correlation(xs),
        volatility: volatility(xs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_median_leaves_input_untouched() {
        let xs = vec![5.0, 1.0, 3.0];
        let _ = median(&xs);
        assert_eq!(xs, vec![5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_std_dev_is_population() {
        // Population stddev of 2,4,4,4,5,5,7,9 is exactly 2
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&xs) - 2.0).abs() < 1e-12);
        assert_eq!(std_dev(&[42.0]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_linear_trend() {
        assert!((linear_trend(&[1.0, 3.0, 5.0, 7.0]) - 2.0).abs() < 1e-12);
        assert!((linear_trend(&[10.0, 9.0, 8.0]) + 1.0).abs() < 1e-12);
        assert_eq!(linear_trend(&[5.0]), 0.0);
    }

    #[test]
    fn test_correlation() {
        assert!((correlation(&[1.0, 2.0, 3.0, 4.0]) - 1.0).abs() < 1e-12);
        assert!((correlation(&[4.0, 3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert_eq!(correlation(&[7.0, 7.0, 7.0]), 0.0);
    }

    #[test]
    fn test_min_max_empty() {
        assert_eq!(min(&[]), 0.0);
        assert_eq!(max(&[]), 0.0);
        assert_eq!(min(&[3.0, -1.0, 2.0]), -1.0);
        assert_eq!(max(&[3.0, -1.0, 2.0]), 3.0);
    }

    #[test]
    fn test_describe() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0, 10.0]);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.range, 9.0);
    }

    proptest! {
        #[test]
        fn prop_std_dev_non_negative(xs in prop::collection::vec(-1000.0f64..1000.0, 0..50)) {
            prop_assert!(std_dev(&xs) >= 0.0);
        }

        #[test]
        fn prop_constant_series_is_flat(c in -100.0f64..100.0, n in 2usize..60) {
            let xs = vec![c; n];
            prop_assert!(std_dev(&xs).abs() < 1e-9);
            prop_assert!(linear_trend(&xs).abs() < 1e-9);
            prop_assert_eq!(correlation(&xs), 0.0);
        }

        #[test]
        fn prop_even_median_averages_middle(mut xs in prop::collection::vec(-1000.0f64..1000.0, 1..25)) {
            if xs.len() % 2 == 1 {
                xs.pop();
            }
            prop_assume!(!xs.is_empty());
            let mut sorted = xs.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let n = sorted.len();
            let expected = (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0;
            prop_assert!((median(&xs) - expected).abs() < 1e-9);
        }

        #[test]
        fn prop_correlation_bounded(xs in prop::collection::vec(-1000.0f64..1000.0, 0..40)) {
            let r = correlation(&xs);
            prop_assert!(r.is_finite());
            prop_assert!((-1.0..=1.0).contains(&r));
        }
    }
}
