use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Virtual posts --

/// Input of the virtual post projection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualPostQuery {
    pub channel_ids: Vec<String>,
    pub from_date: String,
    pub to_date: String,
}

/// Display metadata copied from the source schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDisplay {
    pub name: String,
    pub emoji: Option<String>,
    pub color: Option<String>,
}

/// A post that would exist if the user followed the schedule.
/// Never persisted; rebuilt on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualPost {
    pub id: String,
    pub is_virtual: bool,
    pub status: String,
    pub caption: String,
    pub post_media: Vec<serde_json::Value>,
    pub subreddit: Option<String>,
    pub schedule_id: String,
    pub channel_id: String,
    pub date: DateTime<Utc>,
    pub schedule: ScheduleDisplay,
    /// Shared by siblings of a multi-channel schedule, `None` for single-channel schedules.
    pub post_group_id: Option<String>,
    pub target_channel_ids: Vec<String>,
}

// -- Schedule slots --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPreviewResponse {
    pub schedule_id: String,
    pub slots: Vec<DateTime<Utc>>,
}

// -- Skips --

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SkipSlotRequest {
    pub date: String,
}
