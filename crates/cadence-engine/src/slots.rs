//! Slot generation: turns a cadence rule into concrete timestamps.
//!
//! Every calendar period (day, Monday-start week, month) that overlaps the
//! requested range gets its full candidate list built, even when only part
//! of the period is visible. Selection happens on the full list; the range
//! is applied afterwards. That keeps "the 3rd Friday of the month" stable no
//! matter where the window starts.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};

use cadence_types::models::{ContentSchedule, ScheduleType};

use crate::rule::CadenceRule;

/// Sorted, duplicate-free slots of `schedule` inside `[from, to]`.
/// Returns an empty vector for an inverted range or a disabled schedule.
pub fn generate_schedule_dates(
    schedule: &ContentSchedule,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    slots_for_rule(&CadenceRule::from_schedule(schedule), from, to)
}

pub fn slots_for_rule(rule: &CadenceRule, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    if to < from || rule.per_period == 0 || rule.times.is_empty() {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for (start, end) in periods(rule.kind, from.date_naive(), to.date_naive()) {
        let candidates = period_candidates(rule, start, end);
        slots.extend(
            even_sample(&candidates, rule.per_period)
                .into_iter()
                .filter(|slot| from <= *slot && *slot <= to),
        );
    }

    slots.sort();
    slots.dedup();
    slots
}

/// Indices `floor(i * n / k)` for `i in 0..k`, with `k` capped at `n`.
/// Index 0 is always chosen when anything is, and no index repeats.
pub fn even_sample_indices(n: usize, k: usize) -> impl Iterator<Item = usize> {
    let k = k.min(n);
    (0..k).map(move |i| i * n / k)
}

pub fn even_sample<T: Copy>(candidates: &[T], count: usize) -> Vec<T> {
    even_sample_indices(candidates.len(), count)
        .map(|i| candidates[i])
        .collect()
}

/// Inclusive `(first_day, last_day)` of every period of `kind` touching `[first, last]`.
fn periods(kind: ScheduleType, first: NaiveDate, last: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut start = match kind {
        ScheduleType::Daily => first,
        // Clamps to `first` when the week start would fall before the earliest date.
        ScheduleType::Weekly => first
            .checked_sub_days(Days::new(u64::from(first.weekday().num_days_from_monday())))
            .unwrap_or(first),
        ScheduleType::Monthly => first.with_day(1).unwrap_or(first),
    };

    let mut out = Vec::new();
    while start <= last {
        let next = match kind {
            ScheduleType::Daily => start.succ_opt(),
            ScheduleType::Weekly => start.checked_add_days(Days::new(7)),
            ScheduleType::Monthly => start.checked_add_months(Months::new(1)),
        };
        let Some(next) = next else { break };
        let end = next.pred_opt().unwrap_or(start);
        out.push((start, end));
        start = next;
    }
    out
}

/// Chronological day x time candidates for one period.
fn period_candidates(rule: &CadenceRule, start: NaiveDate, end: NaiveDate) -> Vec<DateTime<Utc>> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| rule.admits(*day))
        .flat_map(|day| rule.times.iter().map(move |time| day.and_time(*time).and_utc()))
        .collect()
}
