//! Materializes recurring shift templates into dated entries.
//!
//! The walk advances one calendar day at a time for every frequency and keeps
//! the days that match the rule. Monthly rules match on day-of-month, so a
//! template on the 31st skips months that have no 31st instead of rolling
//! over into the next month.

use chrono::{Datelike, NaiveDate};
use log::debug;
use uuid::Uuid;

use super::types::{DetailedScheduleEntry, Frequency, Recurrence, ScheduleKind};
use crate::core::error::{ColonyError, ColonyResult};

/// Occurrence cap applied when a rule carries no explicit count.
pub const DEFAULT_MAX_OCCURRENCES: u32 = 52;

/// Largest explicit count a rule may ask for: one entry per day for a year.
pub const MAX_OCCURRENCES_LIMIT: u32 = 366;

pub fn expand(template: &DetailedScheduleEntry) -> ColonyResult<Vec<DetailedScheduleEntry>> {
    if template.kind == ScheduleKind::OneOff {
        return Ok(vec![template.clone()]);
    }

    let recurrence = template.recurrence.as_ref().ok_or_else(|| {
        ColonyError::InvalidRecurrence(format!(
            "recurring entry {} has no recurrence rule",
            template.id
        ))
    })?;
    validate(recurrence, template.date)?;

    let max = recurrence
        .max_occurrences
        .unwrap_or(DEFAULT_MAX_OCCURRENCES) as usize;
    let mut occurrences = Vec::with_capacity(max);
    let mut candidate = template.date;

    while occurrences.len() < max {
        if recurrence.end_date.is_some_and(|end| candidate > end) {
            break;
        }

        if matches_rule(recurrence, template.date, candidate) {
            let index = occurrences.len();
            occurrences.push(occurrence(template, candidate, index));
        }

        candidate = match candidate.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    debug!(
        "Expanded {:?} template {} into {} occurrence(s)",
        recurrence.frequency,
        template.id,
        occurrences.len()
    );
    Ok(occurrences)
}

/// Expands every template, preserving input order.
pub fn expand_all(templates: &[DetailedScheduleEntry]) -> ColonyResult<Vec<DetailedScheduleEntry>> {
    let mut out = Vec::new();
    for template in templates {
        out.extend(expand(template)?);
    }
    Ok(out)
}

fn validate(recurrence: &Recurrence, start: NaiveDate) -> ColonyResult<()> {
    match recurrence.max_occurrences {
        Some(0) => {
            return Err(ColonyError::InvalidRecurrence(
                "max_occurrences must be at least 1".to_string(),
            ))
        }
        Some(n) if n > MAX_OCCURRENCES_LIMIT => {
            return Err(ColonyError::InvalidRecurrence(format!(
                "max_occurrences {n} exceeds the limit of {MAX_OCCURRENCES_LIMIT}"
            )))
        }
        _ => {}
    }

    if let Some(end) = recurrence.end_date {
        if end < start {
            return Err(ColonyError::InvalidRecurrence(format!(
                "end date {end} is before the first date {start}"
            )));
        }
    }

    if recurrence.frequency == Frequency::Weekly {
        let weekdays = recurrence.weekdays.as_deref().unwrap_or_default();
        if weekdays.is_empty() {
            return Err(ColonyError::InvalidRecurrence(
                "weekly recurrence needs at least one weekday".to_string(),
            ));
        }
        if let Some(bad) = weekdays.iter().find(|d| **d > 6) {
            return Err(ColonyError::InvalidRecurrence(format!(
                "weekday {bad} is out of range (0 = Sunday .. 6 = Saturday)"
            )));
        }
    }

    Ok(())
}

fn matches_rule(recurrence: &Recurrence, start: NaiveDate, candidate: NaiveDate) -> bool {
    match recurrence.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => {
            let weekday = candidate.weekday().num_days_from_sunday() as u8;
            recurrence
                .weekdays
                .as_ref()
                .is_some_and(|days| days.contains(&weekday))
        }
        Frequency::Monthly => candidate.day() == start.day(),
    }
}

fn occurrence(template: &DetailedScheduleEntry, date: NaiveDate, index: usize) -> DetailedScheduleEntry {
    DetailedScheduleEntry {
        id: occurrence_id(template.id, index),
        date,
        series_id: Some(template.id),
        ..template.clone()
    }
}

/// Deterministic per template and index, so re-expanding yields the same ids.
pub fn occurrence_id(template_id: Uuid, index: usize) -> Uuid {
    Uuid::new_v5(&template_id, format!("occurrence-{index}").as_bytes())
}
