use crate::rolling::{min_periods, rolling_stats};
use configuration::NormaliseSpec;
use core_types::{NormaliseMethod, ScoreSeries};

/// Score at z = 0.
pub const BASELINE: f64 = 50.0;
/// Score distance from the baseline at z = ±z_to_100_sigma.
const SIGMA_BAND: f64 = 35.0;

/// Converts an oriented series into 0-100 scores using the configured method.
pub fn normalise(series: &[Option<f64>], spec: &NormaliseSpec) -> ScoreSeries {
    match spec.method {
        NormaliseMethod::Zscore => {
            zscore_normalise(series, spec.window(), spec.clip(), spec.z_to_100_sigma())
        }
        NormaliseMethod::Minmax => minmax_normalise(series, spec.window()),
    }
}

/// Rolling z-score mapped onto 0-100 with 50 as the baseline.
///
/// `z` is clipped to `[-clip, clip]`, then `±z_to_100_sigma` maps to 85/15.
/// Months with too few observations, a zero rolling std, or a missing value
/// are `None`.
pub fn zscore_normalise(
    series: &[Option<f64>],
    window_months: usize,
    clip: f64,
    z_to_100_sigma: f64,
) -> ScoreSeries {
    let stats = rolling_stats(series, window_months, min_periods(window_months));
    series
        .iter()
        .zip(stats)
        .map(|(value, stats)| {
            let (value, stats) = ((*value)?, stats?);
            if stats.std == 0.0 {
                return None;
            }
            let z = (value - stats.mean) / stats.std;
            Some(z_to_score(z, clip, z_to_100_sigma))
        })
        .collect()
}

/// Maps a z-score onto the 0-100 scale.
pub fn z_to_score(z: f64, clip: f64, z_to_100_sigma: f64) -> f64 {
    let z = z.clamp(-clip, clip);
    (BASELINE + (z / z_to_100_sigma) * SIGMA_BAND).clamp(0.0, 100.0)
}

/// Position of each value within its rolling min-max range, scaled to 0-100.
pub fn minmax_normalise(series: &[Option<f64>], window_months: usize) -> ScoreSeries {
    let stats = rolling_stats(series, window_months, min_periods(window_months));
    series
        .iter()
        .zip(stats)
        .map(|(value, stats)| {
            let (value, stats) = ((*value)?, stats?);
            let range = stats.max - stats.min;
            if range == 0.0 {
                return None;
            }
            Some(((value - stats.min) / range * 100.0).clamp(0.0, 100.0))
        })
        .collect()
}
