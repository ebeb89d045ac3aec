use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use tracing::warn;

use cadence_types::models::{ContentSchedule, ScheduleType};

/// Slot time used when a schedule has no preferred times.
pub fn default_slot_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Set of weekdays, indexed from Monday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySet([bool; 7]);

impl DaySet {
    pub fn insert(&mut self, day: Weekday) {
        self.0[day.num_days_from_monday() as usize] = true;
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::default();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// Typed view of a [`ContentSchedule`] cadence, ready for slot generation.
#[derive(Debug, Clone, PartialEq)]
pub struct CadenceRule {
    pub kind: ScheduleType,
    /// Selections per period. Zero disables the rule.
    pub per_period: usize,
    /// `None` admits every day.
    pub days: Option<DaySet>,
    /// Ascending, duplicate-free.
    pub times: Vec<NaiveTime>,
}

impl CadenceRule {
    pub fn from_schedule(schedule: &ContentSchedule) -> Self {
        let per_period = usize::try_from(schedule.posts_per_timeframe).unwrap_or(0);

        let days = schedule.preferred_days.as_ref().map(|names| {
            names
                .iter()
                .filter_map(|name| match name.trim().parse::<Weekday>() {
                    Ok(day) => Some(day),
                    Err(_) => {
                        warn!(schedule_id = %schedule.id, day = %name, "Ignoring unrecognised preferred day");
                        None
                    }
                })
                .collect::<DaySet>()
        });

        let times = match &schedule.preferred_times {
            None => vec![default_slot_time()],
            Some(raw) => {
                let mut times: Vec<NaiveTime> = raw
                    .iter()
                    .filter_map(|value| match parse_slot_time(value) {
                        Some(t) => Some(t),
                        None => {
                            warn!(schedule_id = %schedule.id, time = %value, "Ignoring malformed preferred time");
                            None
                        }
                    })
                    .collect();
                times.sort();
                times.dedup();
                times
            }
        };

        Self {
            kind: schedule.schedule_type,
            per_period,
            days,
            times,
        }
    }

    /// Daily rules ignore preferred days; their period is the day itself.
    pub fn admits(&self, date: NaiveDate) -> bool {
        match (self.kind, &self.days) {
            (ScheduleType::Daily, _) | (_, None) => true,
            (_, Some(days)) => days.contains(date.weekday()),
        }
    }
}

/// Parses `"HH:MM"` (or `"HH:MM:SS"`), 24-hour clock.
pub fn parse_slot_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(kind: ScheduleType, days: Option<&[&str]>, times: Option<&[&str]>) -> ContentSchedule {
        ContentSchedule {
            id: "s1".into(),
            channel_id: Some("c1".into()),
            name: "Test".into(),
            schedule_type: kind,
            posts_per_timeframe: 1,
            preferred_days: days.map(|d| d.iter().map(|s| s.to_string()).collect()),
            preferred_times: times.map(|t| t.iter().map(|s| s.to_string()).collect()),
            emoji: None,
            color: None,
        }
    }

    #[test]
    fn times_default_to_noon() {
        let rule = CadenceRule::from_schedule(&schedule(ScheduleType::Daily, None, None));
        assert_eq!(rule.times, vec![NaiveTime::from_hms_opt(12, 0, 0).unwrap()]);
    }

    #[test]
    fn times_are_sorted_and_deduplicated() {
        let rule = CadenceRule::from_schedule(&schedule(
            ScheduleType::Daily,
            None,
            Some(&["21:00", "09:00", "9:00", "bogus", "15:30"]),
        ));
        let hours: Vec<_> = rule.times.iter().map(|t| t.format("%H:%M").to_string()).collect();
        assert_eq!(hours, vec!["09:00", "15:30", "21:00"]);
    }

    #[test]
    fn day_names_accept_short_and_long_forms() {
        let rule = CadenceRule::from_schedule(&schedule(
            ScheduleType::Weekly,
            Some(&["Friday", "mon", "Someday"]),
            None,
        ));
        let days = rule.days.unwrap();
        assert!(days.contains(Weekday::Fri));
        assert!(days.contains(Weekday::Mon));
        assert!(!days.contains(Weekday::Tue));
    }

    #[test]
    fn daily_rule_ignores_preferred_days() {
        let rule = CadenceRule::from_schedule(&schedule(ScheduleType::Daily, Some(&["Monday"]), None));
        // 2026-01-01 is a Thursday
        assert!(rule.admits(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }

    #[test]
    fn negative_count_disables_rule() {
        let mut s = schedule(ScheduleType::Weekly, None, None);
        s.posts_per_timeframe = -3;
        assert_eq!(CadenceRule::from_schedule(&s).per_period, 0);
    }
}
