pub struct StatsHelper;

impl StatsHelper {
    /// Value at index `floor(p/100 * (n-1))` of the ascending-sorted samples.
    ///
    /// An empty slice yields 0.
    pub fn percentile(samples: &[f64], percentile: f64) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let rank = ((percentile / 100.0) * (sorted.len() - 1) as f64).floor();
        let idx = if rank.is_finite() && rank > 0.0 {
            (rank as usize).min(sorted.len() - 1)
        } else {
            0
        };
        sorted[idx]
    }

    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Largest sample, never below 0.
    pub fn max(samples: &[f64]) -> f64 {
        samples.iter().fold(0.0, |acc, &v| if v > acc { v } else { acc })
    }

    /// Centred moving average rounded to 2 decimals.
    ///
    /// The window shrinks at both edges instead of padding, so the output has
    /// one value per input.
    pub fn centered_moving_average(samples: &[f64], window_len: usize) -> Vec<f64> {
        if window_len < 2 {
            return samples.to_vec();
        }
        let half = window_len / 2;
        (0..samples.len())
            .map(|i| {
                let lo = i.saturating_sub(half);
                let hi = (i + half).min(samples.len() - 1);
                let window = &samples[lo..=hi];
                round2(window.iter().sum::<f64>() / window.len() as f64)
            })
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_empty_is_zero() {
        assert_eq!(StatsHelper::percentile(&[], 95.0), 0.0);
    }

    #[test]
    fn percentile_uses_floor_index() {
        let samples = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(StatsHelper::percentile(&samples, 0.0), 1.0);
        assert_eq!(StatsHelper::percentile(&samples, 50.0), 3.0);
        // floor(0.95 * 4) = 3
        assert_eq!(StatsHelper::percentile(&samples, 95.0), 4.0);
        assert_eq!(StatsHelper::percentile(&samples, 100.0), 5.0);
    }

    #[test]
    fn mean_and_max_of_empty_are_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
        assert_eq!(StatsHelper::max(&[]), 0.0);
    }

    #[test]
    fn max_starts_at_zero() {
        assert_eq!(StatsHelper::max(&[-3.0, -1.0]), 0.0);
        assert_eq!(StatsHelper::max(&[2.0, 7.5, 3.0]), 7.5);
    }

    #[test]
    fn moving_average_truncates_at_edges() {
        let smoothed = StatsHelper::centered_moving_average(&[1.0, 2.0, 6.0, 3.0], 3);
        assert_eq!(smoothed, vec![1.5, 3.0, 3.67, 4.5]);
    }

    #[test]
    fn moving_average_stays_within_window_bounds() {
        let raw = [4.2, 9.9, 0.3, 7.7, 5.1, 6.6, 2.0];
        let window = 5;
        let smoothed = StatsHelper::centered_moving_average(&raw, window);
        assert_eq!(smoothed.len(), raw.len());
        for (i, value) in smoothed.iter().enumerate() {
            let lo = i.saturating_sub(window / 2);
            let hi = (i + window / 2).min(raw.len() - 1);
            let slice = &raw[lo..=hi];
            let min = slice.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = slice.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(*value >= min - 0.005 && *value <= max + 0.005);
        }
    }

    #[test]
    fn window_of_one_is_identity() {
        let raw = [1.234, 5.678];
        assert_eq!(StatsHelper::centered_moving_average(&raw, 1), raw.to_vec());
    }
}
