//! Calendar day handling.
//!
//! Days are `chrono::NaiveDate` in memory and canonical `YYYY-MM-DD` text at
//! every boundary (CLI arguments, JSON, SQLite). The text form is fixed-width
//! and zero-padded, so lexicographic order equals calendar order; parsing is
//! strict to keep it that way.

use chrono::{Datelike, Days as CalendarDays, Duration, NaiveDate};
use serde::Serialize;

use crate::{Error, Result};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a canonical `YYYY-MM-DD` day.
///
/// Rejects anything that is not exactly ten characters, so `2024-1-5` and
/// `2024-01-05T00:00` are errors rather than silently normalized.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if s.len() != 10 {
        return Err(Error::InvalidInput(format!(
            "date must be YYYY-MM-DD, got: {}",
            s
        )));
    }
    NaiveDate::parse_from_str(s, DAY_FORMAT)
        .map_err(|_| Error::InvalidInput(format!("date must be YYYY-MM-DD, got: {}", s)))
}

/// Parse a day, also accepting `today`, `yesterday` and `tomorrow` relative to `today`.
pub fn parse_day_relative(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    match s.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => today
            .pred_opt()
            .ok_or_else(|| Error::InvalidInput("date out of range".to_string())),
        "tomorrow" => today
            .succ_opt()
            .ok_or_else(|| Error::InvalidInput("date out of range".to_string())),
        _ => parse_day(s),
    }
}

/// Format a day in canonical form.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// A closed range of calendar days, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, failing with `InvalidRange` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering one day.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// The Monday-to-Sunday week containing `day`.
    pub fn week_of(day: NaiveDate) -> Self {
        let offset = day.weekday().num_days_from_monday() as i64;
        let start = day - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// The `days` days ending on `end`, inclusive.
    pub fn ending_on(end: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::InvalidInput("day count must be at least 1".to_string()));
        }
        let start = end
            .checked_sub_days(CalendarDays::new(days as u64 - 1))
            .ok_or_else(|| Error::InvalidInput(format!("day count too large: {}", days)))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range (always at least 1).
    pub fn len_days(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Iterate every day in the range in order.
    pub fn days(&self) -> Days {
        Days {
            next: Some(self.start),
            end: self.end,
        }
    }
}

/// Iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = current.succ_opt();
        Some(current)
    }
}

/// An owner-scoped range query, validated once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    owner_id: String,
    range: DateRange,
}

impl RangeQuery {
    pub fn new(owner_id: impl Into<String>, range: DateRange) -> Result<Self> {
        let owner_id = owner_id.into();
        if owner_id.trim().is_empty() {
            return Err(Error::InvalidInput("owner must not be empty".to_string()));
        }
        Ok(Self { owner_id, range })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn range(&self) -> DateRange {
        self.range
    }
}
