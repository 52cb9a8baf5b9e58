use core_types::ScoreSeries;

/// One named input to a weighted aggregation, aligned to the calendar grid.
#[derive(Debug, Clone, Copy)]
pub struct WeightedSeries<'a> {
    pub weight: f64,
    pub values: &'a [Option<f64>],
}

/// Weighted mean of the defined entries, renormalising weights over them.
///
/// Returns `None` when no entry is defined. When the defined entries' weights
/// sum to zero they are averaged uniformly.
pub fn weighted_mean<I>(entries: I) -> Option<f64>
where
    I: IntoIterator<Item = (Option<f64>, f64)>,
{
    let available: Vec<(f64, f64)> = entries
        .into_iter()
        .filter_map(|(value, weight)| value.map(|v| (v, weight)))
        .collect();
    if available.is_empty() {
        return None;
    }

    let total: f64 = available.iter().map(|(_, w)| w).sum();
    if total > 0.0 {
        Some(available.iter().map(|(v, w)| v * (w / total)).sum())
    } else {
        Some(available.iter().map(|(v, _)| v).sum::<f64>() / available.len() as f64)
    }
}

/// Month-by-month weighted mean across `inputs`.
///
/// This is the single aggregation used for indicators into a section and for
/// sections into the headline. Every input must have length `len`.
pub fn aggregate(inputs: &[WeightedSeries<'_>], len: usize) -> ScoreSeries {
    (0..len)
        .map(|t| {
            weighted_mean(
                inputs
                    .iter()
                    .map(|input| (input.values.get(t).copied().flatten(), input.weight)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_mean_renormalises() {
        let mean = weighted_mean(vec![(Some(80.0), 0.75), (Some(40.0), 0.25)]).unwrap();
        assert!((mean - 70.0).abs() < 1e-12);
        let mean = weighted_mean(vec![(Some(80.0), 3.0), (Some(40.0), 1.0)]).unwrap();
        assert!((mean - 70.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_available_value_is_returned_exactly() {
        let v = 37.123456789;
        assert_eq!(weighted_mean(vec![(None, 0.9), (Some(v), 0.1), (None, 0.3)]), Some(v));
    }

    #[test]
    fn test_all_missing() {
        assert_eq!(weighted_mean(vec![(None, 1.0), (None, 2.0)]), None);
        assert_eq!(weighted_mean(Vec::<(Option<f64>, f64)>::new()), None);
    }

    #[test]
    fn test_zero_weights_fall_back_to_uniform() {
        let mean = weighted_mean(vec![(Some(10.0), 0.0), (Some(20.0), 0.0), (None, 0.0)]);
        assert_eq!(mean, Some(15.0));
    }

    #[test]
    fn test_zero_weight_subset_is_uniform_over_subset() {
        // the only weighted entry is missing this month
        let mean = weighted_mean(vec![(None, 1.0), (Some(10.0), 0.0), (Some(30.0), 0.0)]);
        assert_eq!(mean, Some(20.0));
    }

    #[test]
    fn test_aggregate_per_month() {
        let a = vec![Some(60.0), None, Some(20.0), None];
        let b = vec![Some(40.0), Some(70.0), None, None];
        let inputs = [
            WeightedSeries { weight: 1.0, values: &a },
            WeightedSeries { weight: 1.0, values: &b },
        ];
        assert_eq!(aggregate(&inputs, 4), vec![Some(50.0), Some(70.0), Some(20.0), None]);
    }

    #[test]
    fn test_absent_equals_missing_that_month() {
        let a = vec![Some(60.0), Some(55.0)];
        let b = vec![Some(40.0), Some(45.0)];
        let c = vec![Some(90.0), Some(10.0)];
        let c_missing = vec![Some(90.0), None];

        let with_missing = aggregate(
            &[
                WeightedSeries { weight: 0.5, values: &a },
                WeightedSeries { weight: 0.3, values: &b },
                WeightedSeries { weight: 0.2, values: &c_missing },
            ],
            2,
        );
        let without = aggregate(
            &[
                WeightedSeries { weight: 0.5, values: &a },
                WeightedSeries { weight: 0.3, values: &b },
            ],
            2,
        );
        let with_all = aggregate(
            &[
                WeightedSeries { weight: 0.5, values: &a },
                WeightedSeries { weight: 0.3, values: &b },
                WeightedSeries { weight: 0.2, values: &c },
            ],
            2,
        );
        assert!((with_missing[1].unwrap() - without[1].unwrap()).abs() < 1e-12);
        assert!((with_missing[0].unwrap() - with_all[0].unwrap()).abs() < 1e-12);
    }
}
