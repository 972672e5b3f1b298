//! Due-date value object.
//!
//! A `DueDate` is an instant that was not in the past when it was
//! constructed. It is held at millisecond precision, so the canonical string
//! (`YYYY-MM-DDTHH:MM:SS.mmmZ`) parses back to an equal value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::DomainError;

/// A due date within this distance of now (or already passed) is "due soon".
pub const DUE_SOON_HORIZON: TimeDelta = TimeDelta::hours(24);

const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(DateTime<Utc>);

impl DueDate {
    /// Parse and validate against the current time.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Self::parse_at(value, Utc::now())
    }

    /// Parse and validate against `now`.
    ///
    /// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as
    /// UTC) and bare `YYYY-MM-DD` dates (midnight UTC).
    pub fn parse_at(value: &str, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let instant =
            parse_instant(value).ok_or_else(|| DomainError::InvalidDueDate(value.to_string()))?;
        Self::new_at(instant, now)
    }

    pub fn new(instant: DateTime<Utc>) -> Result<Self, DomainError> {
        Self::new_at(instant, Utc::now())
    }

    pub fn new_at(instant: DateTime<Utc>, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let instant = truncate_to_millis(instant)
            .ok_or_else(|| DomainError::InvalidDueDate(instant.to_rfc3339()))?;
        let now = truncate_to_millis(now).unwrap_or(now);

        if instant < now {
            return Err(DomainError::PastDueDate(format_canonical(&instant)));
        }

        Ok(Self(instant))
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn is_due_soon(&self) -> bool {
        self.is_due_soon_at(Utc::now())
    }

    /// True when the due date is at most [`DUE_SOON_HORIZON`] after `now`,
    /// including due dates that have since passed.
    pub fn is_due_soon_at(&self, now: DateTime<Utc>) -> bool {
        self.0.signed_duration_since(now) <= DUE_SOON_HORIZON
    }
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn truncate_to_millis(instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(instant.timestamp_millis())
}

fn format_canonical(instant: &DateTime<Utc>) -> String {
    instant.format(CANONICAL_FORMAT).to_string()
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
