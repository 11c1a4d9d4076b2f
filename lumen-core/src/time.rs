//! Time utilities: calendar-day normalization and day arithmetic.
//!
//! Everything that compares days goes through [`DayNumber`], a plain count of
//! days since 1970-01-01. Timestamps are reduced to their calendar day in the
//! offset they were recorded with, so DST shifts never move a log across a
//! day boundary.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::ops::Sub;

use crate::error::{Error, Result};

/// `NaiveDate::num_days_from_ce()` of 1970-01-01.
const EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Canonical calendar day: whole days since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayNumber(pub i64);

impl DayNumber {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE)
    }

    /// Back to a calendar date. `None` only for values far outside chrono's range.
    pub fn to_date(self) -> Option<NaiveDate> {
        let ce = i32::try_from(self.0 + EPOCH_DAYS_FROM_CE).ok()?;
        NaiveDate::from_num_days_from_ce_opt(ce)
    }

    /// The day before.
    pub fn pred(self) -> Self {
        Self(self.0 - 1)
    }

    pub fn minus_days(self, days: i64) -> Self {
        Self(self.0 - days)
    }
}

impl From<NaiveDate> for DayNumber {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl Sub for DayNumber {
    type Output = i64;

    fn sub(self, rhs: Self) -> i64 {
        self.0 - rhs.0
    }
}

/// Normalize a date or timestamp string to its calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 (`2026-10-19T21:30:00-05:00`) and naive
/// `YYYY-MM-DDTHH:MM[:SS]` forms. The time of day is discarded; for offset
/// timestamps the day is the one in the timestamp's own offset.
pub fn calendar_day(input: &str) -> Result<NaiveDate> {
    let s = input.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt.date());
        }
    }

    Err(Error::InvalidDate(input.to_string()))
}

/// `YYYY-MM-DD`.
pub fn format_iso_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Whole days from `today` to `target` (negative when `target` is past).
///
/// Both sides are midnight-normalized first, so a due date at any time on
/// day N gives the same answer as midnight of day N.
pub fn days_difference(target: NaiveDate, today: NaiveDate) -> i64 {
    DayNumber::from(target) - DayNumber::from(today)
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    format_iso_day(a) == format_iso_day(b)
}

/// `today - days`, saturating at chrono's minimum date.
pub fn days_ago(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(chrono::Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// The calendar day it currently is in an IANA timezone like "America/Chicago".
pub fn today_in(tz: &str, now: DateTime<Utc>) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| Error::InvalidTimezone(tz.to_string()))?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Parse an `HH:MM` time of day.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| Error::InvalidTime(input.to_string()))
}

/// `HH:MM`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Inverse of [`minute_of_day`]; wraps past midnight.
pub fn time_from_minute_of_day(minutes: u32) -> NaiveTime {
    let m = minutes % (24 * 60);
    NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Serde adapter for a single `HH:MM` string.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_time_of_day(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time_of_day(&raw).map_err(D::Error::custom)
    }
}

/// Serde adapter for lists of `HH:MM` strings.
pub mod hhmm_list {
    use chrono::NaiveTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(times: &[NaiveTime], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(times.iter().map(|t| super::format_time_of_day(*t)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<NaiveTime>, D::Error> {
        let raw = Vec::<String>::deserialize(d)?;
        raw.iter()
            .map(|s| super::parse_time_of_day(s).map_err(D::Error::custom))
            .collect()
    }
}
