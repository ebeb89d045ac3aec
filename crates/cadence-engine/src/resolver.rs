use std::collections::HashMap;

use cadence_types::models::{ContentSchedule, Post, ScheduleChannel, SkippedScheduleSlot};

use crate::error::Result;
use crate::window::DateWindow;

/// Read-only access to the tables the projection depends on.
/// The engine never writes through this trait.
pub trait ScheduleReader: Send + Sync {
    /// Schedules whose legacy `channel_id` or any `ScheduleChannel` row is in `channel_ids`.
    fn schedules_for_channels(&self, channel_ids: &[String]) -> anyhow::Result<Vec<ContentSchedule>>;

    fn schedule_channels(&self, schedule_ids: &[String]) -> anyhow::Result<Vec<ScheduleChannel>>;

    fn skipped_slots(&self, schedule_id: &str) -> anyhow::Result<Vec<SkippedScheduleSlot>>;

    /// Real posts for one schedule on one channel. Implementations may narrow
    /// the result to `window`; posts outside it never match a generated slot.
    fn posts_for_schedule_channel(
        &self,
        schedule_id: &str,
        channel_id: &str,
        window: &DateWindow,
    ) -> anyhow::Result<Vec<Post>>;
}

/// A schedule paired with every channel it targets, requested or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchedule {
    pub schedule: ContentSchedule,
    pub target_channel_ids: Vec<String>,
}

impl ResolvedSchedule {
    pub fn is_grouped(&self) -> bool {
        self.target_channel_ids.len() > 1
    }
}

/// Loads schedules targeting at least one of `channel_ids`, with full target sets.
pub fn resolve_schedules<R: ScheduleReader + ?Sized>(
    reader: &R,
    channel_ids: &[String],
) -> Result<Vec<ResolvedSchedule>> {
    if channel_ids.is_empty() {
        return Ok(Vec::new());
    }

    let schedules = reader.schedules_for_channels(channel_ids)?;
    if schedules.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = schedules.iter().map(|s| s.id.clone()).collect();
    let mut rows_by_schedule: HashMap<String, Vec<ScheduleChannel>> = HashMap::new();
    for row in reader.schedule_channels(&ids)? {
        rows_by_schedule.entry(row.schedule_id.clone()).or_default().push(row);
    }

    let resolved = schedules
        .into_iter()
        .filter_map(|schedule| {
            let rows = rows_by_schedule.remove(&schedule.id).unwrap_or_default();
            let target_channel_ids = target_channels(&schedule, rows);
            target_channel_ids
                .iter()
                .any(|c| channel_ids.contains(c))
                .then_some(ResolvedSchedule {
                    schedule,
                    target_channel_ids,
                })
        })
        .collect();

    Ok(resolved)
}

/// Uniform target set: join rows by `sort_order`, then the legacy channel if not already listed.
pub fn target_channels(schedule: &ContentSchedule, mut rows: Vec<ScheduleChannel>) -> Vec<String> {
    rows.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.channel_id.cmp(&b.channel_id)));

    let mut targets: Vec<String> = Vec::with_capacity(rows.len() + 1);
    for row in rows {
        if !targets.contains(&row.channel_id) {
            targets.push(row.channel_id);
        }
    }
    if let Some(legacy) = &schedule.channel_id {
        if !targets.contains(legacy) {
            targets.push(legacy.clone());
        }
    }
    targets
}
