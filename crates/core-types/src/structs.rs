use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A grid-aligned series of optional values. `None` marks a missing month.
pub type ScoreSeries = Vec<Option<f64>>;

/// One raw observation in long format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub series_id: String,
    pub date: NaiveDate,
    /// `None` for a missing reading. Non-finite readings are stored as `None`.
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(series_id: impl Into<String>, date: NaiveDate, value: Option<f64>) -> Self {
        Self {
            series_id: series_id.into(),
            date,
            value: value.filter(|v| v.is_finite()),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}
