use cadence_engine::{DateWindow, ScheduleReader};
use cadence_types::models::{ContentSchedule, Post, ScheduleChannel, SkippedScheduleSlot};

use crate::Database;

impl ScheduleReader for Database {
    fn schedules_for_channels(&self, channel_ids: &[String]) -> anyhow::Result<Vec<ContentSchedule>> {
        self.get_schedules_for_channels(channel_ids)
    }

    fn schedule_channels(&self, schedule_ids: &[String]) -> anyhow::Result<Vec<ScheduleChannel>> {
        self.get_schedule_channels(schedule_ids)
    }

    fn skipped_slots(&self, schedule_id: &str) -> anyhow::Result<Vec<SkippedScheduleSlot>> {
        self.get_skipped_slots(schedule_id)
    }

    fn posts_for_schedule_channel(
        &self,
        schedule_id: &str,
        channel_id: &str,
        window: &DateWindow,
    ) -> anyhow::Result<Vec<Post>> {
        self.get_schedule_posts(schedule_id, channel_id, window.from, window.to)
    }
}
