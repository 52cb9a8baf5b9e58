/// Summary statistics of the defined values inside one trailing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (ddof = 0).
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Minimum number of defined observations a window of `window` months needs.
pub fn min_periods(window: usize) -> usize {
    (window / 2).max(6)
}

/// Statistics over the trailing window ending at each grid position.
///
/// The window ending at `t` covers positions `t+1-window ..= t`. Missing
/// entries are skipped and do not count toward `min_periods`; a window with
/// fewer defined values yields `None`.
pub fn rolling_stats(
    series: &[Option<f64>],
    window: usize,
    min_periods: usize,
) -> Vec<Option<WindowStats>> {
    (0..series.len())
        .map(|end| {
            let start = (end + 1).saturating_sub(window);
            window_stats(&series[start..=end], min_periods)
        })
        .collect()
}

fn window_stats(values: &[Option<f64>], min_periods: usize) -> Option<WindowStats> {
    let defined: Vec<f64> = values.iter().flatten().copied().collect();
    let count = defined.len();
    if count == 0 || count < min_periods {
        return None;
    }

    let (min, max) = defined
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    // A constant window has exactly zero spread; the two-pass formula could
    // otherwise leave rounding residue when the mean is not representable.
    let (mean, std) = if min == max {
        (min, 0.0)
    } else {
        let mean = defined.iter().sum::<f64>() / count as f64;
        let variance = defined.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;
        (mean, variance.sqrt())
    };

    Some(WindowStats {
        count,
        mean,
        std,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_periods() {
        assert_eq!(min_periods(12), 6);
        assert_eq!(min_periods(3), 6);
        assert_eq!(min_periods(60), 30);
        assert_eq!(min_periods(25), 12);
    }

    #[test]
    fn test_insufficient_observations() {
        let s: Vec<Option<f64>> = (0..5).map(|i| Some(i as f64)).collect();
        assert!(rolling_stats(&s, 12, 6).iter().all(Option::is_none));
    }

    #[test]
    fn test_missing_values_do_not_count() {
        let s = vec![Some(1.0), None, Some(2.0), Some(3.0), None, Some(4.0), Some(5.0), Some(6.0)];
        let stats = rolling_stats(&s, 12, 6);
        assert!(stats[6].is_none());
        let last = stats[7].unwrap();
        assert_eq!(last.count, 6);
        assert_eq!(last.mean, 3.5);
        assert_eq!(last.min, 1.0);
        assert_eq!(last.max, 6.0);
    }

    #[test]
    fn test_population_std() {
        let s: Vec<Option<f64>> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .into_iter()
            .map(Some)
            .collect();
        let last = rolling_stats(&s, 8, 6)[7].unwrap();
        assert_eq!(last.mean, 5.0);
        assert!((last.std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_trails() {
        let s: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        let last = rolling_stats(&s, 6, 6)[9].unwrap();
        assert_eq!(last.min, 4.0);
        assert_eq!(last.max, 9.0);
        assert_eq!(last.count, 6);
    }

    #[test]
    fn test_constant_window_has_zero_std() {
        let s: Vec<Option<f64>> = (0..8).map(|_| Some(0.1)).collect();
        let last = rolling_stats(&s, 8, 6)[7].unwrap();
        assert_eq!(last.std, 0.0);
        assert_eq!(last.mean, 0.1);
    }
}
