use crate::error::CoreError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Coerces any date to the first day of its month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// A contiguous grid of month-start dates.
///
/// Every series handed to the scoring engine is reindexed onto one of these
/// before any aggregation happens, so a missing month is an explicit `None`
/// rather than a compressed gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCalendar {
    start: NaiveDate,
    len: usize,
}

impl MonthlyCalendar {
    /// Builds the grid spanning the earliest to the latest month (inclusive).
    pub fn between(first: NaiveDate, last: NaiveDate) -> Result<Self, CoreError> {
        let start = month_start(first);
        let end = month_start(last);
        if end < start {
            return Err(CoreError::InvalidInput(
                "calendar".to_string(),
                format!("end month {} precedes start month {}", end, start),
            ));
        }
        let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
        Ok(Self {
            start,
            len: months as usize + 1,
        })
    }

    /// Builds the grid covering every date in `dates`.
    pub fn spanning<I>(dates: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let (min, max) = dates
            .into_iter()
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
            .ok_or(CoreError::EmptyCalendar)?;
        Self::between(min, max)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the month containing `date`, if it lies on the grid.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let date = month_start(date);
        if date < self.start {
            return None;
        }
        let offset = (date.year() - self.start.year()) * 12 + date.month() as i32
            - self.start.month() as i32;
        let offset = offset as usize;
        (offset < self.len).then_some(offset)
    }

    /// Month-start date at grid position `index`.
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        if index >= self.len {
            return None;
        }
        self.start.checked_add_months(Months::new(index as u32))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.len).filter_map(move |i| self.date_at(i))
    }
}
