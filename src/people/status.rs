//! Effective agent status for a given day.
//!
//! Order of precedence:
//! 1. a leave day on the reference date gives `OnLeave`, even when a detailed
//!    shift exists for that same date;
//! 2. a stored `Inactive` is an administrator override. It also wins over an
//!    all-rest week with no detailed shift, which would otherwise give
//!    `Upcoming`;
//! 3. no detailed shift in the Sunday-start week and a rest slot gives
//!    `Upcoming`;
//! 4. a detailed shift in the week or a working slot gives `Active`.

use chrono::{Datelike, Duration, NaiveDate};

use super::types::{is_rest_slot, Agent, AgentStatus};
use crate::core::error::{parse_iso_date, ColonyResult};

/// First and last day (inclusive) of the Sunday-start week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(i64::from(date.weekday().num_days_from_sunday()));
    (start, start + Duration::days(6))
}

pub fn has_detailed_schedule_in_week(agent: &Agent, date: NaiveDate) -> bool {
    let (start, end) = week_bounds(date);
    agent
        .detailed_schedules
        .iter()
        .any(|entry| entry.date >= start && entry.date <= end)
}

pub fn derive_status(agent: &Agent, date: NaiveDate) -> AgentStatus {
    let iso = date.format("%Y-%m-%d").to_string();
    if agent.is_on_leave(&iso) {
        return AgentStatus::OnLeave;
    }

    if agent.status == AgentStatus::Inactive {
        return AgentStatus::Inactive;
    }

    let detailed_this_week = has_detailed_schedule_in_week(agent, date);
    let standard = agent.weekly_schedule.slot(date.weekday());
    let resting = is_rest_slot(standard);

    if !detailed_this_week && resting {
        AgentStatus::Upcoming
    } else if detailed_this_week || !resting {
        AgentStatus::Active
    } else {
        agent.status
    }
}

/// Same as [`derive_status`] for a `YYYY-MM-DD` string.
pub fn derive_status_for(agent: &Agent, iso_date: &str) -> ColonyResult<AgentStatus> {
    let date = parse_iso_date(iso_date)?;
    Ok(derive_status(agent, date))
}
