//! Cadence projection engine.
//!
//! Turns content schedules into read-only virtual posts for a date window:
//! slots are generated per cadence, reconciled against real posts and user
//! skips, then expanded across every channel the schedule targets.

pub mod assemble;
pub mod conflicts;
pub mod error;
pub mod resolver;
pub mod rule;
pub mod slots;
pub mod window;

use tracing::{debug, info};

use cadence_types::api::{VirtualPost, VirtualPostQuery};

pub use error::{EngineError, Result};
pub use resolver::{ResolvedSchedule, ScheduleReader};
pub use slots::generate_schedule_dates;
pub use window::DateWindow;

use crate::assemble::{ChannelSlots, assemble};
use crate::conflicts::ConflictFilter;
use crate::resolver::resolve_schedules;

/// Projects the not-yet-created posts implied by every schedule targeting
/// `query.channel_ids` within `[from_date, to_date]`.
///
/// Output is ordered by date, then schedule id, then target channel order.
pub fn fetch_virtual_posts<R: ScheduleReader + ?Sized>(
    reader: &R,
    query: &VirtualPostQuery,
) -> Result<Vec<VirtualPost>> {
    let window = DateWindow::parse(&query.from_date, &query.to_date)?;
    let requested = normalize_channel_ids(&query.channel_ids);
    if requested.is_empty() {
        return Ok(Vec::new());
    }

    let resolved = resolve_schedules(reader, &requested)?;
    let mut posts = Vec::new();

    for entry in &resolved {
        let schedule_id = entry.schedule.id.as_str();
        let slots = generate_schedule_dates(&entry.schedule, window.from, window.to);
        if slots.is_empty() {
            debug!(schedule_id, "No slots in window");
            continue;
        }

        let filter = ConflictFilter::load(reader, schedule_id)?;
        let mut channel_slots = Vec::new();
        for channel_id in entry.target_channel_ids.iter().filter(|c| requested.contains(c)) {
            let existing = reader.posts_for_schedule_channel(schedule_id, channel_id, &window)?;
            channel_slots.push(ChannelSlots {
                channel_id: channel_id.clone(),
                slots: filter.open_slots(&slots, channel_id, &existing),
            });
        }

        let built = assemble(entry, &channel_slots, &requested);
        debug!(
            schedule_id,
            generated = slots.len(),
            targets = entry.target_channel_ids.len(),
            virtual_posts = built.len(),
            "Projected schedule"
        );
        posts.extend(built);
    }

    // Stable sort keeps target channel order within one slot.
    posts.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.schedule_id.cmp(&b.schedule_id)));

    info!(
        channels = requested.len(),
        schedules = resolved.len(),
        virtual_posts = posts.len(),
        "Virtual posts projected"
    );
    Ok(posts)
}

fn normalize_channel_ids(channel_ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(channel_ids.len());
    for id in channel_ids.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        if !out.iter().any(|existing| existing == id) {
            out.push(id.to_string());
        }
    }
    out
}
