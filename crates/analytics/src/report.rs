use crate::momentum::momentum_label;
use chrono::NaiveDate;
use core_types::{Momentum, MonthlyCalendar, ScoreSeries};
use serde::Serialize;

/// Score series of one indicator that contributed to its section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorScores {
    pub id: String,
    /// Configured weight inside the section (before per-month renormalisation).
    pub weight: f64,
    pub scores: ScoreSeries,
}

/// One sub-index: the aggregated section score plus the indicators behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionScores {
    pub id: String,
    /// Configured headline weight.
    pub weight: f64,
    pub scores: ScoreSeries,
    pub indicators: Vec<IndicatorScores>,
}

/// An indicator that was configured but had no data in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedIndicator {
    pub section_id: String,
    pub indicator_id: String,
}

/// The output of one compute run. Every series is aligned to `calendar`.
///
/// This struct is the data transfer object handed to the dashboard layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeReport {
    pub calendar: MonthlyCalendar,
    /// Contributing sections, in config order.
    pub sections: Vec<SectionScores>,
    pub headline_raw: ScoreSeries,
    pub headline_smoothed: ScoreSeries,
    pub skipped_indicators: Vec<SkippedIndicator>,
    /// Sections with no contributing indicator; they carry no headline weight.
    pub dropped_sections: Vec<String>,
}

impl CompositeReport {
    pub fn section(&self, id: &str) -> Option<&SectionScores> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.id.as_str())
    }

    /// The most recent month with a defined smoothed headline.
    pub fn latest_headline(&self) -> Option<(NaiveDate, f64)> {
        latest(&self.calendar, &self.headline_smoothed)
    }

    pub fn headline_momentum(&self) -> Momentum {
        momentum_label(&self.headline_smoothed)
    }

    /// Momentum label of each section, in report order.
    pub fn section_momentum(&self) -> Vec<(&str, Momentum)> {
        self.sections
            .iter()
            .map(|s| (s.id.as_str(), momentum_label(&s.scores)))
            .collect()
    }
}

/// Last defined value of `series` together with its month.
pub fn latest(calendar: &MonthlyCalendar, series: &[Option<f64>]) -> Option<(NaiveDate, f64)> {
    series
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, v)| Some((calendar.date_at(i)?, (*v)?)))
}
