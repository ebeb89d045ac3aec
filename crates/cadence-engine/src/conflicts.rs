use std::collections::HashSet;

use chrono::{DateTime, Utc};

use cadence_types::models::{Post, SkippedScheduleSlot};

use crate::error::Result;
use crate::resolver::ScheduleReader;

/// Removes slots that are already materialized or were skipped by the user.
///
/// Matching is exact timestamp equality. Skips apply to every channel of the
/// schedule; existing posts only block their own channel.
#[derive(Debug, Clone, Default)]
pub struct ConflictFilter {
    schedule_id: String,
    skipped: HashSet<DateTime<Utc>>,
}

impl ConflictFilter {
    pub fn load<R: ScheduleReader + ?Sized>(reader: &R, schedule_id: &str) -> Result<Self> {
        let skips = reader.skipped_slots(schedule_id)?;
        Ok(Self::from_skips(schedule_id, &skips))
    }

    pub fn from_skips(schedule_id: &str, skips: &[SkippedScheduleSlot]) -> Self {
        Self {
            schedule_id: schedule_id.to_string(),
            skipped: skips
                .iter()
                .filter(|s| s.schedule_id == schedule_id)
                .map(|s| s.date)
                .collect(),
        }
    }

    pub fn is_skipped(&self, slot: DateTime<Utc>) -> bool {
        self.skipped.contains(&slot)
    }

    /// Slots still open on `channel_id`, given the real posts known for it.
    pub fn open_slots(&self, slots: &[DateTime<Utc>], channel_id: &str, posts: &[Post]) -> Vec<DateTime<Utc>> {
        let taken: HashSet<DateTime<Utc>> = posts
            .iter()
            .filter(|p| p.channel_id == channel_id && p.schedule_id.as_deref() == Some(self.schedule_id.as_str()))
            .map(|p| p.date)
            .collect();

        slots
            .iter()
            .copied()
            .filter(|slot| !self.is_skipped(*slot) && !taken.contains(slot))
            .collect()
    }
}
