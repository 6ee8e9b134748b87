//! Aggregation of simulated ending values

/// Nearest-rank percentile of an ascending slice
///
/// Index is `floor(p * n)` clamped to the last element. `sorted` must be non-empty.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let index = ((p * n as f64).floor() as usize).min(n - 1);
    sorted[index]
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Share of values strictly above `threshold`, as a percentage
pub fn share_above(values: &[f64], threshold: f64) -> f64 {
    let above = values.iter().filter(|&&v| v > threshold).count();
    above as f64 / values.len() as f64 * 100.0
}

/// Sort ending values ascending; NaN sorts last
pub fn sort_values(values: &mut [f64]) {
    values.sort_unstable_by(|a, b| a.total_cmp(b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nearest_rank_indices() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();

        assert_eq!(percentile(&values, 0.05), 1.0);
        assert_eq!(percentile(&values, 0.25), 3.0);
        assert_eq!(percentile(&values, 0.50), 6.0);
        assert_eq!(percentile(&values, 0.95), 10.0);
        assert_eq!(percentile(&values, 1.0), 10.0);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(percentile(&[5.0], 0.05), 5.0);
        assert_eq!(percentile(&[5.0], 0.95), 5.0);
    }

    #[test]
    fn test_mean_and_share() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(mean(&values), 2.5);
        assert_relative_eq!(share_above(&values, 2.0), 50.0);
        assert_relative_eq!(share_above(&values, 4.0), 0.0);
    }

    #[test]
    fn test_sort_values() {
        let mut values = vec![3.0, 1.0, 2.0];
        sort_values(&mut values);
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}
