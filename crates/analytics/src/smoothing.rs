use core_types::ScoreSeries;

/// Exponentially weighted moving average with adjustment disabled.
///
/// `alpha = 2 / (span + 1)`, seeded by the first defined value. With no gaps
/// each step is `s[t] = (1 - alpha) * s[t-1] + alpha * x[t]`. Across missing
/// months the previous smoothed value keeps decaying, so after `k` missing
/// months the next observation is blended with weight `(1 - alpha)^(k+1)` on
/// the old value against `alpha`. Once seeded, a missing month repeats the
/// last smoothed value, so only the months before the first observation are
/// `None`.
pub fn ewma(series: &[Option<f64>], span: usize) -> ScoreSeries {
    let alpha = 2.0 / (span.max(1) as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut smoothed: Option<f64> = None;
    let mut old_weight = 1.0;

    series
        .iter()
        .map(|value| match (smoothed, *value) {
            (None, None) => None,
            (None, Some(x)) => {
                smoothed = Some(x);
                old_weight = 1.0;
                smoothed
            }
            (Some(prev), None) => {
                old_weight *= decay;
                Some(prev)
            }
            (Some(prev), Some(x)) => {
                old_weight *= decay;
                let next = (old_weight * prev + alpha * x) / (old_weight + alpha);
                smoothed = Some(next);
                old_weight = 1.0;
                smoothed
            }
        })
        .collect()
}
