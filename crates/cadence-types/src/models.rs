use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recurrence period of a content schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Daily,
    Weekly,
    Monthly,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScheduleType(pub String);

impl fmt::Display for UnknownScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown schedule type '{}'", self.0)
    }
}

impl std::error::Error for UnknownScheduleType {}

impl FromStr for ScheduleType {
    type Err = UnknownScheduleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(UnknownScheduleType(s.to_string())),
        }
    }
}

/// A user-defined posting cadence.
///
/// `channel_id` is the legacy single-channel target. Grouped schedules
/// target their channels through [`ScheduleChannel`] rows instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSchedule {
    pub id: String,
    pub channel_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    /// Desired slots per recurrence period. Zero or negative disables the schedule.
    pub posts_per_timeframe: i64,
    /// Weekday names. `None` means every day.
    pub preferred_days: Option<Vec<String>>,
    /// `"HH:MM"` strings. `None` means a single slot at 12:00.
    pub preferred_times: Option<Vec<String>>,
    pub emoji: Option<String>,
    pub color: Option<String>,
}

/// Multi-channel targeting row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleChannel {
    pub schedule_id: String,
    pub channel_id: String,
    pub sort_order: i64,
}

/// A generated slot the user excluded, for every channel of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedScheduleSlot {
    pub id: String,
    pub schedule_id: String,
    pub date: DateTime<Utc>,
}

/// The subset of a persisted post needed to detect an already-materialized slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub schedule_id: Option<String>,
    pub channel_id: String,
    pub date: DateTime<Utc>,
}
