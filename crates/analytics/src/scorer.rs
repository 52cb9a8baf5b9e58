use crate::normalise::normalise;
use crate::transform::{apply_transform, orient};
use configuration::IndicatorSpec;
use core_types::ScoreSeries;

/// Scores one indicator: transform, orient so higher means more stress, normalise.
///
/// `values` must already be aligned to the calendar grid. The result has the
/// same length and is `None` wherever any stage was undefined.
pub fn score_indicator(values: &[Option<f64>], spec: &IndicatorSpec) -> ScoreSeries {
    let transformed = apply_transform(values, &spec.transform);
    let oriented = orient(transformed, spec.direction);
    normalise(&oriented, &spec.normalise_or_default())
}
