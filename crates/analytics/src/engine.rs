use crate::aggregate::{aggregate, WeightedSeries};
use crate::error::AnalyticsError;
use crate::report::{CompositeReport, IndicatorScores, SectionScores, SkippedIndicator};
use crate::scorer::score_indicator;
use crate::smoothing::ewma;
use configuration::{Config, SectionSpec};
use core_types::{MonthlyCalendar, Observation, ScoreSeries};
use std::collections::{HashMap, HashSet};

/// The stress-index calculator.
///
/// Holds only the immutable config and the list of indicator ids it expects;
/// every call to `compute` rebuilds all series from scratch.
#[derive(Debug, Clone)]
pub struct CompositeEngine {
    config: Config,
    indicator_ids: Vec<String>,
}

impl CompositeEngine {
    pub fn new(config: Config) -> Self {
        let mut seen = HashSet::new();
        let indicator_ids = config
            .indicator_ids()
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self {
            config,
            indicator_ids,
        }
    }

    /// Distinct indicator ids referenced by the config, in config order.
    pub fn indicator_ids(&self) -> &[String] {
        &self.indicator_ids
    }

    /// The main entry point: scores every section and the headline composite.
    ///
    /// # Arguments
    ///
    /// * `observations` - Long-format raw data in any order. Dates are coerced
    ///   to month starts; ids not referenced by the config are ignored.
    ///
    /// # Returns
    ///
    /// A `CompositeReport` on the calendar spanning every observed month, or an
    /// `AnalyticsError` when no input was given or nothing could be scored.
    pub fn compute(&self, observations: &[Observation]) -> Result<CompositeReport, AnalyticsError> {
        if observations.is_empty() {
            return Err(AnalyticsError::NoObservations);
        }
        let calendar = MonthlyCalendar::spanning(observations.iter().map(|o| o.date))?;
        let pivot = self.pivot(observations, &calendar);

        let mut sections = Vec::new();
        let mut skipped_indicators = Vec::new();
        let mut dropped_sections = Vec::new();

        for section in &self.config.sections {
            let (indicators, skipped) = score_section_indicators(section, &pivot);
            skipped_indicators.extend(skipped.into_iter().map(|indicator_id| SkippedIndicator {
                section_id: section.id.clone(),
                indicator_id,
            }));

            if indicators.is_empty() {
                tracing::warn!(
                    section = %section.id,
                    "No indicator in section has data; section dropped"
                );
                dropped_sections.push(section.id.clone());
                continue;
            }

            let inputs: Vec<WeightedSeries<'_>> = indicators
                .iter()
                .map(|i| WeightedSeries {
                    weight: i.weight,
                    values: &i.scores,
                })
                .collect();
            let scores = aggregate(&inputs, calendar.len());

            tracing::debug!(
                section = %section.id,
                indicators = indicators.len(),
                defined_months = defined_count(&scores),
                "Section scored"
            );
            sections.push(SectionScores {
                id: section.id.clone(),
                weight: section.weight,
                scores,
                indicators,
            });
        }

        if sections.is_empty() {
            return Err(AnalyticsError::NoSectionScores);
        }

        let headline_raw = headline(&sections, calendar.len());
        if headline_raw.iter().all(Option::is_none) {
            return Err(AnalyticsError::EmptyHeadline(
                sections.iter().map(|s| s.id.clone()).collect(),
            ));
        }
        let headline_smoothed = ewma(&headline_raw, self.config.span_months());

        tracing::info!(
            months = calendar.len(),
            sections = sections.len(),
            dropped_sections = dropped_sections.len(),
            skipped_indicators = skipped_indicators.len(),
            "Composite computed"
        );

        Ok(CompositeReport {
            calendar,
            sections,
            headline_raw,
            headline_smoothed,
            skipped_indicators,
            dropped_sections,
        })
    }

    /// Reshapes long-format observations into one grid-aligned series per expected id.
    fn pivot(
        &self,
        observations: &[Observation],
        calendar: &MonthlyCalendar,
    ) -> HashMap<String, ScoreSeries> {
        let mut pivot: HashMap<String, ScoreSeries> = self
            .indicator_ids
            .iter()
            .map(|id| (id.clone(), vec![None; calendar.len()]))
            .collect();
        let mut filled: HashSet<(&str, usize)> = HashSet::new();

        for obs in observations {
            let Some(series) = pivot.get_mut(&obs.series_id) else {
                continue;
            };
            let Some(index) = calendar.index_of(obs.date) else {
                continue;
            };
            if !filled.insert((obs.series_id.as_str(), index)) {
                tracing::warn!(
                    series_id = %obs.series_id,
                    month = %obs.date,
                    "Duplicate observation for month; keeping the later one"
                );
            }
            // fields are public, so a NaN can bypass Observation::new
            series[index] = obs.value.filter(|v| v.is_finite());
        }

        pivot
    }
}

/// Scores every indicator of `section` that has data. Returns the scored
/// indicators and the ids of those skipped for lack of data.
fn score_section_indicators(
    section: &SectionSpec,
    pivot: &HashMap<String, ScoreSeries>,
) -> (Vec<IndicatorScores>, Vec<String>) {
    let mut scored = Vec::new();
    let mut skipped = Vec::new();

    for (index, spec) in section.indicators.iter().enumerate() {
        let values = match pivot.get(&spec.id) {
            Some(values) if values.iter().any(Option::is_some) => values,
            _ => {
                tracing::warn!(
                    section = %section.id,
                    indicator = %spec.id,
                    "No data for indicator; skipped"
                );
                skipped.push(spec.id.clone());
                continue;
            }
        };

        let scores = score_indicator(values, spec);
        tracing::debug!(
            indicator = %spec.id,
            transform = spec.transform.as_str(),
            defined_months = defined_count(&scores),
            "Indicator scored"
        );
        scored.push(IndicatorScores {
            id: spec.id.clone(),
            weight: section.indicator_weight(index),
            scores,
        });
    }

    (scored, skipped)
}

fn headline(sections: &[SectionScores], len: usize) -> ScoreSeries {
    let inputs: Vec<WeightedSeries<'_>> = sections
        .iter()
        .map(|s| WeightedSeries {
            weight: s.weight,
            values: &s.scores,
        })
        .collect();
    aggregate(&inputs, len)
}

fn defined_count(series: &[Option<f64>]) -> usize {
    series.iter().filter(|v| v.is_some()).count()
}
