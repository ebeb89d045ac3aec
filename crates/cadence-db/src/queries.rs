use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use uuid::Uuid;

use cadence_types::models::{ContentSchedule, Post, ScheduleChannel, SkippedScheduleSlot};

use crate::Database;
use crate::models::{PostRow, ScheduleChannelRow, ScheduleRow, SkippedSlotRow, encode_list, utc_to_millis};

const SCHEDULE_COLUMNS: &str =
    "id, channel_id, name, type, posts_per_timeframe, preferred_days, preferred_times, emoji, color";

impl Database {
    // -- Channels --

    pub fn insert_channel(&self, id: &str, name: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("INSERT INTO channels (id, name) VALUES (?1, ?2)", (id, name))?;
            Ok(())
        })
    }

    // -- Schedules --

    pub fn insert_schedule(&self, schedule: &ContentSchedule) -> Result<()> {
        let days = encode_list(schedule.preferred_days.as_ref())?;
        let times = encode_list(schedule.preferred_times.as_ref())?;
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO content_schedules
                    (id, channel_id, name, type, posts_per_timeframe, preferred_days, preferred_times, emoji, color)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    schedule.id,
                    schedule.channel_id,
                    schedule.name,
                    schedule.schedule_type.as_str(),
                    schedule.posts_per_timeframe,
                    days,
                    times,
                    schedule.emoji,
                    schedule.color,
                ],
            )?;
            Ok(())
        })
    }

    pub fn add_schedule_channel(&self, schedule_id: &str, channel_id: &str, sort_order: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO schedule_channels (schedule_id, channel_id, sort_order) VALUES (?1, ?2, ?3)",
                params![schedule_id, channel_id, sort_order],
            )?;
            Ok(())
        })
    }

    pub fn get_schedule(&self, id: &str) -> Result<Option<ContentSchedule>> {
        self.with_conn(|conn| query_schedule(conn, id))
    }

    /// Schedules targeting any of `channel_ids`, via the legacy column or the join table.
    pub fn get_schedules_for_channels(&self, channel_ids: &[String]) -> Result<Vec<ContentSchedule>> {
        if channel_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders = numbered_placeholders(channel_ids.len());
            let sql = format!(
                "SELECT {SCHEDULE_COLUMNS} FROM content_schedules
                 WHERE channel_id IN ({placeholders})
                    OR id IN (SELECT schedule_id FROM schedule_channels WHERE channel_id IN ({placeholders}))
                 ORDER BY created_at, id"
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(channel_ids.iter()), schedule_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(ContentSchedule::try_from).collect()
        })
    }

    pub fn get_schedule_channels(&self, schedule_ids: &[String]) -> Result<Vec<ScheduleChannel>> {
        if schedule_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT schedule_id, channel_id, sort_order FROM schedule_channels
                 WHERE schedule_id IN ({})
                 ORDER BY schedule_id, sort_order, channel_id",
                numbered_placeholders(schedule_ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(schedule_ids.iter()), |row| {
                    Ok(ScheduleChannelRow {
                        schedule_id: row.get(0)?,
                        channel_id: row.get(1)?,
                        sort_order: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows.into_iter().map(ScheduleChannel::from).collect())
        })
    }

    // -- Skipped slots --

    pub fn get_skipped_slots(&self, schedule_id: &str) -> Result<Vec<SkippedScheduleSlot>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, schedule_id, date FROM skipped_schedule_slots
                 WHERE schedule_id = ?1
                 ORDER BY date",
            )?;
            let rows = stmt
                .query_map([schedule_id], skipped_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(SkippedScheduleSlot::try_from).collect()
        })
    }

    /// Records a skip. Returns `(created, slot)`; an existing skip for the
    /// same timestamp is returned unchanged with `created = false`.
    pub fn skip_slot(&self, schedule_id: &str, date: DateTime<Utc>) -> Result<(bool, SkippedScheduleSlot)> {
        let id = Uuid::new_v4().to_string();
        let date_ms = utc_to_millis(date)?;

        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO skipped_schedule_slots (id, schedule_id, date) VALUES (?1, ?2, ?3)",
                params![id, schedule_id, date_ms],
            )?;

            let row = conn.query_row(
                "SELECT id, schedule_id, date FROM skipped_schedule_slots WHERE schedule_id = ?1 AND date = ?2",
                params![schedule_id, date_ms],
                skipped_row,
            )?;

            Ok((inserted > 0, SkippedScheduleSlot::try_from(row)?))
        })
    }

    /// Removes a skip. Returns false when there was nothing to remove.
    pub fn unskip_slot(&self, schedule_id: &str, date: DateTime<Utc>) -> Result<bool> {
        let date_ms = utc_to_millis(date)?;
        self.with_conn_mut(|conn| {
            let removed = conn.execute(
                "DELETE FROM skipped_schedule_slots WHERE schedule_id = ?1 AND date = ?2",
                params![schedule_id, date_ms],
            )?;
            Ok(removed > 0)
        })
    }

    // -- Posts --

    pub fn insert_post(&self, post: &Post) -> Result<()> {
        let date_ms = utc_to_millis(post.date)?;
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO posts (id, schedule_id, channel_id, date) VALUES (?1, ?2, ?3, ?4)",
                params![post.id, post.schedule_id, post.channel_id, date_ms],
            )?;
            Ok(())
        })
    }

    /// Posts of one schedule on one channel with `from <= date <= to`.
    pub fn get_schedule_posts(
        &self,
        schedule_id: &str,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Post>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, schedule_id, channel_id, date FROM posts
                 WHERE schedule_id = ?1 AND channel_id = ?2 AND date BETWEEN ?3 AND ?4
                 ORDER BY date",
            )?;
            let rows = stmt
                .query_map(
                    params![schedule_id, channel_id, from.timestamp_millis(), to.timestamp_millis()],
                    |row| {
                        Ok(PostRow {
                            id: row.get(0)?,
                            schedule_id: row.get(1)?,
                            channel_id: row.get(2)?,
                            date_ms: row.get(3)?,
                        })
                    },
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(Post::try_from).collect()
        })
    }
}

fn query_schedule(conn: &Connection, id: &str) -> Result<Option<ContentSchedule>> {
    let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM content_schedules WHERE id = ?1");
    let row = conn.query_row(&sql, [id], schedule_row).optional()?;
    row.map(ContentSchedule::try_from).transpose()
}

fn schedule_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleRow> {
    Ok(ScheduleRow {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        name: row.get(2)?,
        schedule_type: row.get(3)?,
        posts_per_timeframe: row.get(4)?,
        preferred_days: row.get(5)?,
        preferred_times: row.get(6)?,
        emoji: row.get(7)?,
        color: row.get(8)?,
    })
}

fn skipped_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SkippedSlotRow> {
    Ok(SkippedSlotRow {
        id: row.get(0)?,
        schedule_id: row.get(1)?,
        date_ms: row.get(2)?,
    })
}

/// `?1, ?2, ... ?n`; numbered so a list can be referenced twice in one statement.
fn numbered_placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ")
}
