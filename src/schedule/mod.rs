//! Detailed (date-specific) shifts and their recurrence rules.

pub mod recurrence;
pub mod types;

pub use recurrence::{expand, expand_all, DEFAULT_MAX_OCCURRENCES, MAX_OCCURRENCES_LIMIT};
pub use types::*;

use chrono::NaiveDate;
use uuid::Uuid;

/// Shifts for one agent, optionally restricted to a single date, sorted by date.
pub fn schedules_for_agent(
    entries: &[DetailedScheduleEntry],
    agent_id: Uuid,
    date: Option<NaiveDate>,
) -> Vec<DetailedScheduleEntry> {
    let mut out: Vec<DetailedScheduleEntry> = entries
        .iter()
        .filter(|e| e.agent_id == agent_id)
        .filter(|e| date.map_or(true, |d| e.date == d))
        .cloned()
        .collect();
    out.sort_by_key(|e| (e.date, e.start_time));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_schedules_for_agent_filters_and_sorts() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();

        let entries = vec![
            DetailedScheduleEntry::one_off(me, d("2024-01-17"), t(8), t(12)),
            DetailedScheduleEntry::one_off(other, d("2024-01-15"), t(8), t(12)),
            DetailedScheduleEntry::one_off(me, d("2024-01-15"), t(14), t(18)),
            DetailedScheduleEntry::one_off(me, d("2024-01-15"), t(7), t(11)),
        ];

        let mine = schedules_for_agent(&entries, me, None);
        assert_eq!(mine.len(), 3);
        assert_eq!(mine[0].start_time, t(7));
        assert_eq!(mine[2].date, d("2024-01-17"));

        let on_day = schedules_for_agent(&entries, me, Some(d("2024-01-15")));
        assert_eq!(on_day.len(), 2);
    }
}
