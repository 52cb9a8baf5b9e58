use core_types::{Direction, ScoreSeries, Transform};

/// Months of lag used by the year-over-year transform.
const YOY_LAG: usize = 12;

/// Applies `transform` to a grid-aligned series, returning a series of the same length.
///
/// `Transform::Unknown` passes the values through unchanged.
pub fn apply_transform(series: &[Option<f64>], transform: &Transform) -> ScoreSeries {
    match transform {
        Transform::Level => series.to_vec(),
        Transform::Delta => lagged(series, 1, |cur, prev| Some(cur - prev)),
        Transform::Mom => lagged(series, 1, pct_change),
        Transform::Yoy => lagged(series, YOY_LAG, pct_change),
        Transform::Unknown(name) => {
            tracing::debug!(transform = %name, "Unknown transform, passing series through");
            series.to_vec()
        }
    }
}

/// Flips the sign of a lower-is-worse series so that higher always means more stress.
pub fn orient(series: ScoreSeries, direction: Direction) -> ScoreSeries {
    match direction {
        Direction::HigherIsWorse => series,
        Direction::LowerIsWorse => series.into_iter().map(|v| v.map(|x| -x)).collect(),
    }
}

/// Combines each value with the one `lag` months earlier. Missing on either side
/// (or before the lag is available) gives a missing result.
fn lagged<F>(series: &[Option<f64>], lag: usize, combine: F) -> ScoreSeries
where
    F: Fn(f64, f64) -> Option<f64>,
{
    series
        .iter()
        .enumerate()
        .map(|(t, cur)| {
            let prev = t.checked_sub(lag).and_then(|p| series[p])?;
            combine((*cur)?, prev).filter(|v| v.is_finite())
        })
        .collect()
}

/// Percent change, undefined when the base is zero.
fn pct_change(cur: f64, prev: f64) -> Option<f64> {
    if prev == 0.0 {
        return None;
    }
    Some((cur / prev - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map_or(false, |a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_level_is_identity() {
        let s = vec![Some(1.0), None, Some(3.0)];
        assert_eq!(apply_transform(&s, &Transform::Level), s);
    }

    #[test]
    fn test_delta() {
        let s = vec![Some(1.0), Some(4.0), None, Some(2.0), Some(1.5)];
        let d = apply_transform(&s, &Transform::Delta);
        assert_eq!(d, vec![None, Some(3.0), None, None, Some(-0.5)]);
    }

    #[test]
    fn test_mom_handles_zero_base() {
        let s = vec![Some(100.0), Some(110.0), Some(0.0), Some(5.0), Some(4.0)];
        let m = apply_transform(&s, &Transform::Mom);
        assert_eq!(m[0], None);
        assert!(close(m[1], 10.0));
        assert!(close(m[2], -100.0));
        assert_eq!(m[3], None);
        assert!(close(m[4], -20.0));
    }

    #[test]
    fn test_yoy() {
        let s: Vec<Option<f64>> = (0..14).map(|i| Some(100.0 + i as f64)).collect();
        let y = apply_transform(&s, &Transform::Yoy);
        assert_eq!(y.len(), 14);
        assert!(y[..12].iter().all(Option::is_none));
        assert!(close(y[12], 12.0));
        assert!(close(y[13], 12.0 / 101.0 * 100.0));
    }

    #[test]
    fn test_yoy_missing_lag() {
        let mut s: Vec<Option<f64>> = (0..13).map(|_| Some(50.0)).collect();
        s[0] = None;
        let y = apply_transform(&s, &Transform::Yoy);
        assert_eq!(y[12], None);
    }

    #[test]
    fn test_unknown_transform_passthrough() {
        let s = vec![Some(2.0), None, Some(-1.0)];
        assert_eq!(apply_transform(&s, &Transform::Unknown("qoq".to_string())), s);
    }

    #[test]
    fn test_orient() {
        let s = vec![Some(2.0), None, Some(-1.0)];
        assert_eq!(orient(s.clone(), Direction::HigherIsWorse), s);
        assert_eq!(
            orient(s, Direction::LowerIsWorse),
            vec![Some(-2.0), None, Some(1.0)]
        );
    }
}
