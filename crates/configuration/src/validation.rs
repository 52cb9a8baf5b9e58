use crate::settings::{Config, NormaliseSpec};
use core_types::{NormaliseMethod, Transform};
use std::collections::HashSet;

/// Shortest window that can ever satisfy the minimum-observation rule.
const MIN_USEFUL_WINDOW: usize = 6;

/// Validate the stress-index configuration at load time.
/// Returns all validation errors at once (not just the first).
///
/// Soft problems (unknown transforms, windows too short to ever score) are
/// logged as warnings and do not fail validation.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.sections.is_empty() {
        errors.push("sections: at least one section is required".to_string());
    }

    if config.span_months() < 1 {
        errors.push("composite.smoothing.span_months: must be at least 1".to_string());
    }

    let mut section_ids = HashSet::new();
    for (s, section) in config.sections.iter().enumerate() {
        let path = format!("sections[{}]", s);

        if section.id.trim().is_empty() {
            errors.push(format!("{}.id: must not be empty", path));
        } else if !section_ids.insert(section.id.as_str()) {
            errors.push(format!("{}.id: duplicate section id '{}'", path, section.id));
        }

        if !is_valid_weight(section.weight) {
            errors.push(format!(
                "{}.weight: must be a finite non-negative number, got {}",
                path, section.weight
            ));
        }

        if section.indicators.is_empty() {
            errors.push(format!("{}.indicators: at least one indicator is required", path));
        }

        let mut indicator_ids = HashSet::new();
        for (i, indicator) in section.indicators.iter().enumerate() {
            let path = format!("{}.indicators[{}]", path, i);

            if indicator.id.trim().is_empty() {
                errors.push(format!("{}.id: must not be empty", path));
            } else if !indicator_ids.insert(indicator.id.as_str()) {
                errors.push(format!(
                    "{}.id: duplicate indicator id '{}' in section '{}'",
                    path, indicator.id, section.id
                ));
            }

            if let Some(weight) = indicator.section_weight {
                if !is_valid_weight(weight) {
                    errors.push(format!(
                        "{}.section_weight: must be a finite non-negative number, got {}",
                        path, weight
                    ));
                }
            }

            if let Transform::Unknown(name) = &indicator.transform {
                tracing::warn!(
                    indicator = %indicator.id,
                    transform = %name,
                    "Unknown transform, raw values will be passed through unchanged"
                );
            }

            if let Some(ref normalise) = indicator.normalise {
                validate_normalise(normalise, &format!("{}.normalise", path), &mut errors);
                if normalise.window() < MIN_USEFUL_WINDOW {
                    tracing::warn!(
                        indicator = %indicator.id,
                        window_months = normalise.window(),
                        "Window is shorter than the minimum observation count; indicator will never score"
                    );
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_normalise(spec: &NormaliseSpec, path: &str, errors: &mut Vec<String>) {
    if spec.window() < 1 {
        errors.push(format!("{}.window_months: must be at least 1", path));
    }

    // clip and sigma only matter for zscore, but a bad value is still a typo worth reporting
    if let Some(clip) = spec.clip {
        if !(clip.is_finite() && clip > 0.0) {
            errors.push(format!("{}.clip: must be positive, got {}", path, clip));
        }
    }
    if let Some(sigma) = spec.z_to_100_sigma {
        if !(sigma.is_finite() && sigma > 0.0) {
            errors.push(format!("{}.z_to_100_sigma: must be positive, got {}", path, sigma));
        }
    }

    let has_zscore_keys = spec.clip.is_some() || spec.z_to_100_sigma.is_some();
    if spec.method == NormaliseMethod::Minmax && has_zscore_keys {
        tracing::warn!(path, "clip and z_to_100_sigma are ignored by the minmax method");
    }
}

fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{CompositeSpec, IndicatorSpec, SectionSpec, SmoothingSpec};

    fn section(id: &str, weight: f64, indicators: Vec<IndicatorSpec>) -> SectionSpec {
        SectionSpec {
            id: id.to_string(),
            weight,
            indicators,
        }
    }

    fn config(sections: Vec<SectionSpec>) -> Config {
        Config {
            sections,
            composite: CompositeSpec::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let cfg = config(vec![section("rates", 0.5, vec![IndicatorSpec::new("dgs10")])]);
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_empty_sections() {
        let errors = validate_config(&config(vec![])).unwrap_err();
        assert!(errors[0].contains("sections"));
    }

    #[test]
    fn test_empty_indicator_list() {
        let errors = validate_config(&config(vec![section("rates", 1.0, vec![])])).unwrap_err();
        assert!(errors[0].contains("sections[0].indicators"));
    }

    #[test]
    fn test_duplicate_ids() {
        let cfg = config(vec![
            section("rates", 1.0, vec![IndicatorSpec::new("a"), IndicatorSpec::new("a")]),
            section("rates", 1.0, vec![IndicatorSpec::new("b")]),
        ]);
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("duplicate indicator id 'a'")));
        assert!(errors.iter().any(|e| e.contains("duplicate section id 'rates'")));
    }

    #[test]
    fn test_same_indicator_in_two_sections_is_allowed() {
        let cfg = config(vec![
            section("a", 1.0, vec![IndicatorSpec::new("vix")]),
            section("b", 1.0, vec![IndicatorSpec::new("vix")]),
        ]);
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_negative_weights() {
        let mut ind = IndicatorSpec::new("a");
        ind.section_weight = Some(-0.1);
        let cfg = config(vec![section("rates", f64::NAN, vec![ind])]);
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("sections[0].weight"));
        assert!(errors[1].contains("sections[0].indicators[0].section_weight"));
    }

    #[test]
    fn test_bad_normalise_parameters() {
        let mut ind = IndicatorSpec::new("a");
        ind.normalise = Some(NormaliseSpec {
            window_months: Some(0),
            clip: Some(0.0),
            z_to_100_sigma: Some(-1.0),
            ..Default::default()
        });
        let errors = validate_config(&config(vec![section("s", 1.0, vec![ind])])).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("window_months"));
        assert!(errors[1].contains("clip"));
        assert!(errors[2].contains("z_to_100_sigma"));
    }

    #[test]
    fn test_zero_span() {
        let mut cfg = config(vec![section("s", 1.0, vec![IndicatorSpec::new("a")])]);
        cfg.composite.smoothing = SmoothingSpec { span_months: 0 };
        let errors = validate_config(&cfg).unwrap_err();
        assert!(errors[0].contains("span_months"));
    }

    #[test]
    fn test_unknown_transform_is_not_an_error() {
        let mut ind = IndicatorSpec::new("a");
        ind.transform = Transform::Unknown("qoq".to_string());
        assert!(validate_config(&config(vec![section("s", 1.0, vec![ind])])).is_ok());
    }

    #[test]
    fn test_zero_weights_are_allowed() {
        let mut ind = IndicatorSpec::new("a");
        ind.section_weight = Some(0.0);
        assert!(validate_config(&config(vec![section("s", 0.0, vec![ind])])).is_ok());
    }
}
