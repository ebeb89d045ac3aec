use chrono::{DateTime, Utc};

use cadence_types::api::{ScheduleDisplay, VirtualPost};

use crate::resolver::ResolvedSchedule;

pub const VIRTUAL_ID_PREFIX: &str = "virtual-";
pub const DRAFT_STATUS: &str = "draft";

/// Open slots for one target channel of a schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSlots {
    pub channel_id: String,
    pub slots: Vec<DateTime<Utc>>,
}

pub fn virtual_post_id(schedule_id: &str, channel_id: &str, date: DateTime<Utc>) -> String {
    format!("{VIRTUAL_ID_PREFIX}{schedule_id}-{channel_id}-{}", date.timestamp_millis())
}

/// Key shared by all siblings generated for one slot of a multi-channel schedule.
pub fn post_group_id(schedule_id: &str, date: DateTime<Utc>) -> String {
    format!("{VIRTUAL_ID_PREFIX}group-{schedule_id}-{}", date.timestamp_millis())
}

/// Builds the virtual posts of one schedule, keeping only `requested` channels.
pub fn assemble(entry: &ResolvedSchedule, channel_slots: &[ChannelSlots], requested: &[String]) -> Vec<VirtualPost> {
    let display = ScheduleDisplay {
        name: entry.schedule.name.clone(),
        emoji: entry.schedule.emoji.clone(),
        color: entry.schedule.color.clone(),
    };
    let grouped = entry.is_grouped();
    let schedule_id = entry.schedule.id.as_str();

    channel_slots
        .iter()
        .filter(|cs| entry.target_channel_ids.contains(&cs.channel_id))
        .filter(|cs| requested.contains(&cs.channel_id))
        .flat_map(|cs| {
            cs.slots.iter().map(|date| VirtualPost {
                id: virtual_post_id(schedule_id, &cs.channel_id, *date),
                is_virtual: true,
                status: DRAFT_STATUS.to_string(),
                caption: String::new(),
                post_media: Vec::new(),
                subreddit: None,
                schedule_id: schedule_id.to_string(),
                channel_id: cs.channel_id.clone(),
                date: *date,
                schedule: display.clone(),
                post_group_id: grouped.then(|| post_group_id(schedule_id, *date)),
                target_channel_ids: entry.target_channel_ids.clone(),
            })
        })
        .collect()
}
