use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::error::{EngineError, Result};

/// Widest accepted window, in days.
pub const MAX_WINDOW_DAYS: i64 = 732;

const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Inclusive `[from, to]` range in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

impl DateWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if to < from {
            return Err(EngineError::InvalidRange { from, to });
        }
        let days = (to - from).num_days();
        if days > MAX_WINDOW_DAYS {
            return Err(EngineError::WindowTooWide {
                days,
                max: MAX_WINDOW_DAYS,
            });
        }
        Ok(Self { from, to })
    }

    /// Parses caller-supplied bounds. A bare `YYYY-MM-DD` covers the whole
    /// day: `from` snaps to its first millisecond, `to` to its last.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let from = parse_bound("fromDate", from, Bound::Start)?;
        let to = parse_bound("toDate", to, Bound::End)?;
        Self::new(from, to)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant <= self.to
    }
}

/// Parses a single RFC 3339 timestamp, offsets normalised to UTC.
/// Timestamps without an offset are read as UTC. Precision finer than a
/// millisecond and years outside 1..=9999 are rejected.
pub fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    parse_any_instant(value.trim())
        .filter(|dt| dt.nanosecond() % 1_000_000 == 0)
        .filter(|dt| YEAR_RANGE.contains(&dt.year()))
        .ok_or_else(|| EngineError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn parse_any_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn parse_bound(field: &'static str, value: &str, bound: Bound) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        let naive = match bound {
            Bound::Start => Some(date.and_time(NaiveTime::MIN)),
            Bound::End => date.and_hms_milli_opt(23, 59, 59, 999),
        };
        return naive
            .filter(|_| YEAR_RANGE.contains(&date.year()))
            .map(|n| n.and_utc())
            .ok_or(EngineError::InvalidDate {
                field,
                value: value.to_string(),
            });
    }
    parse_instant(field, value)
}
