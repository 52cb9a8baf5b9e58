use crate::rolling::rolling_stats;
use core_types::Momentum;

const Z_WINDOW: usize = 12;
const Z_MIN_PERIODS: usize = 6;
const SLOPE_LAG: usize = 3;
const THRESHOLD: f64 = 0.5;

/// Classifies the most recent state of a score series.
///
/// The latest 12-month rolling z-score decides first; the 3-month slope only
/// breaks the tie when z is inside the band or undefined.
pub fn momentum_label(series: &[Option<f64>]) -> Momentum {
    if series.iter().all(Option::is_none) {
        return Momentum::Unknown;
    }

    let z = latest_z(series);
    let slope = latest_slope(series);
    tracing::trace!(?z, ?slope, "Momentum inputs");

    match (z, slope) {
        (Some(z), _) if z >= THRESHOLD => Momentum::Worsening,
        (Some(z), _) if z <= -THRESHOLD => Momentum::Easing,
        (_, Some(s)) if s >= THRESHOLD => Momentum::Worsening,
        (_, Some(s)) if s <= -THRESHOLD => Momentum::Easing,
        _ => Momentum::Stable,
    }
}

fn latest_z(series: &[Option<f64>]) -> Option<f64> {
    let last = (*series.last()?)?;
    let stats = rolling_stats(series, Z_WINDOW, Z_MIN_PERIODS).pop()??;
    (stats.std > 0.0).then(|| (last - stats.mean) / stats.std)
}

fn latest_slope(series: &[Option<f64>]) -> Option<f64> {
    let n = series.len();
    if n <= SLOPE_LAG {
        return Some(0.0);
    }
    Some(series[n - 1]? - series[n - 1 - SLOPE_LAG]?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defined(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(momentum_label(&[]), Momentum::Unknown);
        assert_eq!(momentum_label(&[None, None]), Momentum::Unknown);
    }

    #[test]
    fn test_rising_series_is_worsening() {
        let s = defined(&[50.0, 51.0, 52.0, 53.0, 54.0, 55.0, 56.0, 57.0]);
        assert_eq!(momentum_label(&s), Momentum::Worsening);
    }

    #[test]
    fn test_falling_series_is_easing() {
        let s = defined(&[57.0, 56.0, 55.0, 54.0, 53.0, 52.0, 51.0, 50.0]);
        assert_eq!(momentum_label(&s), Momentum::Easing);
    }

    #[test]
    fn test_flat_series_is_stable() {
        let s = defined(&[50.0; 10]);
        assert_eq!(momentum_label(&s), Momentum::Stable);
    }

    #[test]
    fn test_short_series_uses_slope_only() {
        // too short for a z-score, slope is 60 - 50
        let s = defined(&[50.0, 52.0, 55.0, 60.0]);
        assert_eq!(momentum_label(&s), Momentum::Worsening);
        // fewer than four points: slope counts as zero
        assert_eq!(momentum_label(&defined(&[50.0, 70.0])), Momentum::Stable);
    }

    #[test]
    fn test_z_takes_priority_over_slope() {
        // last value is well below the window mean, but above the value 3 months ago
        let s = defined(&[60.0, 60.0, 61.0, 59.0, 60.0, 20.0, 60.0, 61.0, 30.0, 40.0, 45.0, 35.0]);
        assert_eq!(latest_slope(&s), Some(5.0));
        assert!(latest_z(&s).unwrap() <= -0.5);
        assert_eq!(momentum_label(&s), Momentum::Easing);
    }
}
