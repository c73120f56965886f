// SPDX-License-Identifier: MIT

//! Calendar date helpers: parsing, inclusive ranges, and the leaderboard week.
//!
//! All week arithmetic is done on UTC calendar dates. A week runs from
//! Sunday through the following Saturday, both days included.

use crate::error::{AppError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(AppError::BadRequest(
                "endDate must be after startDate".to_string(),
            ));
        }
        Ok(Self {
            start_date: start,
            end_date: end,
        })
    }

    /// Range between two instants, ordered as points in time and then
    /// reduced to their UTC calendar dates.
    pub fn from_instants(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(AppError::BadRequest(
                "endDate must be after startDate".to_string(),
            ));
        }
        Self::new(start.date_naive(), end.date_naive())
    }

    /// The Sunday..Saturday week that contains `date`.
    pub fn week_containing(date: NaiveDate) -> Self {
        let back = i64::from(date.weekday().num_days_from_sunday());
        let start = date - Duration::days(back);
        Self {
            start_date: start,
            end_date: start + Duration::days(6),
        }
    }

    /// The week containing `now`, anchored on the UTC calendar date.
    pub fn current_week(now: DateTime<Utc>) -> Self {
        Self::week_containing(now.date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end(&self) -> NaiveDate {
        self.end_date
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(raw: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::BadRequest(format!("{} must be in YYYY-MM-DD format", what)))
}

/// Parse an ISO 8601 date or RFC 3339 datetime as a UTC instant.
///
/// A bare date means midnight UTC of that day.
pub fn parse_iso_instant(raw: &str, what: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest(format!("Valid {} (ISO8601) is required", what)))
}

/// Parse optional `start`/`end` bounds, requiring `end >= start` when both exist.
pub fn parse_optional_bounds(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = start.map(|s| parse_date(s, "Start date")).transpose()?;
    let end = end.map(|s| parse_date(s, "End date")).transpose()?;
    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            return Err(AppError::BadRequest(
                "End date must be after or same as start date".to_string(),
            ));
        }
    }
    Ok((start, end))
}
