use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Timelike, Utc};

use cadence_types::models::{ContentSchedule, Post, ScheduleChannel, SkippedScheduleSlot};

/// Database row types. These map directly to SQLite rows.
/// Distinct from cadence-types models to keep the DB layer independent.
pub struct ScheduleRow {
    pub id: String,
    pub channel_id: Option<String>,
    pub name: String,
    pub schedule_type: String,
    pub posts_per_timeframe: i64,
    /// JSON array of weekday names
    pub preferred_days: Option<String>,
    /// JSON array of "HH:MM" strings
    pub preferred_times: Option<String>,
    pub emoji: Option<String>,
    pub color: Option<String>,
}

pub struct ScheduleChannelRow {
    pub schedule_id: String,
    pub channel_id: String,
    pub sort_order: i64,
}

pub struct SkippedSlotRow {
    pub id: String,
    pub schedule_id: String,
    pub date_ms: i64,
}

pub struct PostRow {
    pub id: String,
    pub schedule_id: Option<String>,
    pub channel_id: String,
    pub date_ms: i64,
}

pub fn millis_to_utc(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow!("Timestamp out of range: {}", ms))
}

/// Stored timestamps are whole milliseconds; anything finer would not compare
/// equal after a round trip.
pub fn utc_to_millis(date: DateTime<Utc>) -> Result<i64> {
    if date.nanosecond() % 1_000_000 != 0 {
        bail!("Timestamp {} is finer than millisecond precision", date.to_rfc3339());
    }
    Ok(date.timestamp_millis())
}

fn decode_list(column: &str, id: &str, raw: Option<String>) -> Result<Option<Vec<String>>> {
    raw.map(|json| {
        serde_json::from_str::<Vec<String>>(&json)
            .with_context(|| format!("Corrupt {} on schedule '{}'", column, id))
    })
    .transpose()
}

pub fn encode_list(values: Option<&Vec<String>>) -> Result<Option<String>> {
    Ok(values.map(serde_json::to_string).transpose()?)
}

impl TryFrom<ScheduleRow> for ContentSchedule {
    type Error = anyhow::Error;

    fn try_from(row: ScheduleRow) -> Result<Self> {
        let schedule_type = row
            .schedule_type
            .parse()
            .with_context(|| format!("Corrupt type on schedule '{}'", row.id))?;
        let preferred_days = decode_list("preferred_days", &row.id, row.preferred_days)?;
        let preferred_times = decode_list("preferred_times", &row.id, row.preferred_times)?;

        Ok(ContentSchedule {
            id: row.id,
            channel_id: row.channel_id,
            name: row.name,
            schedule_type,
            posts_per_timeframe: row.posts_per_timeframe,
            preferred_days,
            preferred_times,
            emoji: row.emoji,
            color: row.color,
        })
    }
}

impl From<ScheduleChannelRow> for ScheduleChannel {
    fn from(row: ScheduleChannelRow) -> Self {
        ScheduleChannel {
            schedule_id: row.schedule_id,
            channel_id: row.channel_id,
            sort_order: row.sort_order,
        }
    }
}

impl TryFrom<SkippedSlotRow> for SkippedScheduleSlot {
    type Error = anyhow::Error;

    fn try_from(row: SkippedSlotRow) -> Result<Self> {
        Ok(SkippedScheduleSlot {
            date: millis_to_utc(row.date_ms)?,
            id: row.id,
            schedule_id: row.schedule_id,
        })
    }
}

impl TryFrom<PostRow> for Post {
    type Error = anyhow::Error;

    fn try_from(row: PostRow) -> Result<Self> {
        Ok(Post {
            date: millis_to_utc(row.date_ms)?,
            id: row.id,
            schedule_id: row.schedule_id,
            channel_id: row.channel_id,
        })
    }
}
