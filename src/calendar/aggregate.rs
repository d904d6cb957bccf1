//! Unified day view.
//!
//! Entries are emitted in a fixed category order: explicit events, tasks due
//! that day, agents on leave, detailed shifts, then unresolved incidents
//! reported that day. Within a category the source collection order is kept.

use chrono::{Duration, NaiveDate};
use log::debug;
use std::collections::HashMap;
use uuid::Uuid;

use super::types::{CalendarEvent, DayEntry, DayEntrySource, DaySummary, EventKind};
use crate::core::error::{ColonyError, ColonyResult};
use crate::incidents::Incident;
use crate::people::Agent;
use crate::tasks::Task;

pub const TASK_MARKER: &str = "📋";
pub const LEAVE_MARKER: &str = "🏖️";
pub const SHIFT_MARKER: &str = "⏰";
pub const INCIDENT_MARKER: &str = "🚨";
pub const UNASSIGNED: &str = "Unassigned";

/// Planned state used for entries that carry no status of their own.
const PLANNED: &str = "planned";

pub fn entries_for_date(
    date: NaiveDate,
    events: &[CalendarEvent],
    tasks: &[Task],
    agents: &[Agent],
    incidents: &[Incident],
) -> ColonyResult<Vec<DayEntry>> {
    let names: HashMap<Uuid, String> = agents.iter().map(|a| (a.id, a.display_name())).collect();
    let iso = date.format("%Y-%m-%d").to_string();
    let mut entries = Vec::new();

    entries.extend(events.iter().filter(|e| e.date == date).map(event_entry));

    for task in tasks {
        if task.due_day()? == Some(date) {
            entries.push(task_entry(task, date, &names));
        }
    }

    entries.extend(
        agents
            .iter()
            .filter(|a| a.is_on_leave(&iso))
            .map(|a| leave_entry(a, date, &iso)),
    );

    for agent in agents {
        for shift in agent.detailed_schedules.iter().filter(|s| s.date == date) {
            let mut description = shift.time_range();
            if let Some(notes) = shift.notes.as_deref().filter(|n| !n.trim().is_empty()) {
                description.push_str(" | ");
                description.push_str(notes);
            }
            description.push_str(" | ");
            description.push_str(&agent.role_label);

            entries.push(DayEntry {
                id: format!("schedule-{}-{}-{}", agent.id, shift.id, iso),
                date,
                source: DayEntrySource::Schedule,
                kind: EventKind::Task,
                marker: SHIFT_MARKER.to_string(),
                title: format!("{SHIFT_MARKER} Shift - {}", agent.display_name()),
                description,
                agent_id: Some(agent.id),
                status: shift.status.as_str().to_string(),
            });
        }
    }

    entries.extend(
        incidents
            .iter()
            .filter(|i| i.is_open() && i.reported_at.date_naive() == date)
            .map(|i| incident_entry(i, date, &names)),
    );

    debug!("Calendar {iso}: {} entries", entries.len());
    Ok(entries)
}

/// Day views for every date in `start..=end`.
pub fn entries_for_range(
    start: NaiveDate,
    end: NaiveDate,
    events: &[CalendarEvent],
    tasks: &[Task],
    agents: &[Agent],
    incidents: &[Incident],
) -> ColonyResult<Vec<DaySummary>> {
    if end < start {
        return Err(ColonyError::InvalidInput(format!(
            "range end {end} is before start {start}"
        )));
    }

    let days = (end - start).num_days();
    (0..=days)
        .map(|offset| {
            let date = start + Duration::days(offset);
            entries_for_date(date, events, tasks, agents, incidents)
                .map(|entries| DaySummary { date, entries })
        })
        .collect()
}

fn event_entry(event: &CalendarEvent) -> DayEntry {
    DayEntry {
        id: event.id.to_string(),
        date: event.date,
        source: DayEntrySource::CalendarEvent,
        kind: event.kind,
        marker: event.kind.marker().to_string(),
        title: event.title.clone(),
        description: event.description.clone(),
        agent_id: event.agent_id,
        status: PLANNED.to_string(),
    }
}

fn task_entry(task: &Task, date: NaiveDate, names: &HashMap<Uuid, String>) -> DayEntry {
    let assignee = task
        .agent_id
        .and_then(|id| names.get(&id))
        .map(String::as_str)
        .unwrap_or(UNASSIGNED);

    DayEntry {
        id: format!("task-{}", task.id),
        date,
        source: DayEntrySource::Task,
        kind: EventKind::Task,
        marker: TASK_MARKER.to_string(),
        title: format!("{TASK_MARKER} {}", task.title),
        description: format!("{} - {} ({})", task.description, assignee, task.building),
        agent_id: task.agent_id,
        status: task.status.as_str().to_string(),
    }
}

fn leave_entry(agent: &Agent, date: NaiveDate, iso: &str) -> DayEntry {
    DayEntry {
        id: format!("leave-{}-{}", agent.id, iso),
        date,
        source: DayEntrySource::Leave,
        kind: EventKind::Leave,
        marker: LEAVE_MARKER.to_string(),
        title: format!("{LEAVE_MARKER} Leave - {}", agent.display_name()),
        description: agent.role_label.clone(),
        agent_id: Some(agent.id),
        status: PLANNED.to_string(),
    }
}

fn incident_entry(incident: &Incident, date: NaiveDate, names: &HashMap<Uuid, String>) -> DayEntry {
    let assignment = match incident.agent_id.and_then(|id| names.get(&id)) {
        Some(name) => format!(" | Assigned to: {name}"),
        None => format!(" | {UNASSIGNED}"),
    };

    DayEntry {
        id: format!("incident-{}", incident.id),
        date,
        source: DayEntrySource::Incident,
        kind: EventKind::Maintenance,
        marker: INCIDENT_MARKER.to_string(),
        title: format!("{INCIDENT_MARKER} Incident: {}", incident.title),
        description: format!(
            "{} | {} - {}{}",
            incident.description, incident.building, incident.room, assignment
        ),
        agent_id: incident.agent_id,
        status: incident.state.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incidents::IncidentState;
    use crate::people::{AgentStatus, RoleType, WeeklySchedule};
    use crate::schedule::DetailedScheduleEntry;
    use crate::tasks::{TaskPriority, TaskStatus};
    use chrono::{NaiveTime, TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn agent(first: &str, last: &str) -> Agent {
        Agent {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: String::new(),
            phone: String::new(),
            role_label: "Agent technique".to_string(),
            role_type: RoleType::Technical,
            role_color: "#059669".to_string(),
            weekly_schedule: WeeklySchedule::six_days("07:00-15:00"),
            leave_days: Vec::new(),
            status: AgentStatus::Active,
            manager_notes: None,
            detailed_schedules: Vec::new(),
        }
    }

    fn event(on: &str, title: &str) -> CalendarEvent {
        CalendarEvent {
            id: Uuid::new_v4(),
            date: date(on),
            kind: EventKind::Event,
            title: title.to_string(),
            description: "Grand jeu".to_string(),
            agent_id: None,
            child_count: Some(40),
        }
    }

    fn task(title: &str, due: Option<&str>, agent_id: Option<Uuid>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "Remplacer le joint".to_string(),
            agent_id,
            building: "Bâtiment B".to_string(),
            priority: TaskPriority::High,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            due_date: due.map(str::to_string),
        }
    }

    fn incident(title: &str, reported: &str, state: IncidentState) -> Incident {
        let day = date(reported);
        Incident {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "Plus d'eau chaude".to_string(),
            building: "Bâtiment A".to_string(),
            room: "Chambres 1-10".to_string(),
            reported_by: "Sophie Bernard".to_string(),
            reported_at: Utc.from_utc_datetime(&day.and_hms_opt(9, 30, 0).unwrap()),
            state,
            resolved_at: None,
            agent_id: None,
        }
    }

    #[test]
    fn test_event_task_incident_in_fixed_order() {
        let events = vec![event("2024-07-10", "Fête du camp")];
        let tasks = vec![task("Fuite cuisine", Some("2024-07-10T10:00"), None)];
        let incidents = vec![incident("Chauffe-eau", "2024-07-10", IncidentState::Unresolved)];

        let entries = entries_for_date(date("2024-07-10"), &events, &tasks, &[], &incidents).unwrap();

        let sources: Vec<DayEntrySource> = entries.iter().map(|e| e.source).collect();
        assert_eq!(
            sources,
            vec![
                DayEntrySource::CalendarEvent,
                DayEntrySource::Task,
                DayEntrySource::Incident
            ]
        );
        assert_eq!(entries[0].title, "Fête du camp");
        assert_eq!(entries[1].title, "📋 Fuite cuisine");
        assert_eq!(
            entries[1].description,
            "Remplacer le joint - Unassigned (Bâtiment B)"
        );
        assert_eq!(entries[2].title, "🚨 Incident: Chauffe-eau");
        assert_eq!(
            entries[2].description,
            "Plus d'eau chaude | Bâtiment A - Chambres 1-10 | Unassigned"
        );
    }

    #[test]
    fn test_resolved_incidents_excluded() {
        let incidents = vec![
            incident("Open", "2024-07-10", IncidentState::InProgress),
            incident("Closed", "2024-07-10", IncidentState::Resolved),
        ];
        let entries = entries_for_date(date("2024-07-10"), &[], &[], &[], &incidents).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, "in_progress");
        assert!(entries.iter().all(|e| !e.title.contains("Closed")));
    }

    #[test]
    fn test_leave_and_shifts() {
        let mut pierre = agent("Pierre", "Martin");
        pierre.leave_days.push("2024-07-10".to_string());
        let mut sophie = agent("Sophie", "Bernard");
        sophie.role_label = "Agent d'entretien".to_string();
        let mut shift = DetailedScheduleEntry::one_off(
            sophie.id,
            date("2024-07-10"),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
        );
        shift.notes = Some("Ménage réfectoire".to_string());
        sophie.detailed_schedules.push(shift.clone());
        sophie.detailed_schedules.push(DetailedScheduleEntry::one_off(
            sophie.id,
            date("2024-07-11"),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        ));

        let agents = vec![pierre.clone(), sophie.clone()];
        let entries = entries_for_date(date("2024-07-10"), &[], &[], &agents, &[]).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].source, DayEntrySource::Leave);
        assert_eq!(entries[0].title, "🏖️ Leave - Pierre Martin");
        assert_eq!(entries[0].agent_id, Some(pierre.id));
        assert_eq!(entries[1].source, DayEntrySource::Schedule);
        assert_eq!(entries[1].title, "⏰ Shift - Sophie Bernard");
        assert_eq!(
            entries[1].description,
            "08:00 - 12:30 | Ménage réfectoire | Agent d'entretien"
        );
        assert_eq!(
            entries[1].id,
            format!("schedule-{}-{}-2024-07-10", sophie.id, shift.id)
        );
    }

    #[test]
    fn test_task_assignee_name_and_dangling_reference() {
        let pierre = agent("Pierre", "Martin");
        let tasks = vec![
            task("Assigned", Some("2024-07-10"), Some(pierre.id)),
            task("Dangling", Some("2024-07-10"), Some(Uuid::new_v4())),
            task("Other day", Some("2024-07-11"), Some(pierre.id)),
            task("No deadline", None, None),
        ];
        let entries =
            entries_for_date(date("2024-07-10"), &[], &tasks, &[pierre], &[]).unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].description.contains("Pierre Martin"));
        assert!(entries[1].description.contains(UNASSIGNED));
    }

    #[test]
    fn test_incident_assignee_shown() {
        let pierre = agent("Pierre", "Martin");
        let mut open = incident("Prise", "2024-07-10", IncidentState::InProgress);
        open.agent_id = Some(pierre.id);
        let entries =
            entries_for_date(date("2024-07-10"), &[], &[], &[pierre], &[open]).unwrap();
        assert!(entries[0].description.ends_with(" | Assigned to: Pierre Martin"));
    }

    #[test]
    fn test_insertion_order_kept_within_category() {
        let events = vec![
            event("2024-07-10", "Zèbre"),
            event("2024-07-10", "Atelier"),
            event("2024-07-11", "Demain"),
        ];
        let entries = entries_for_date(date("2024-07-10"), &events, &[], &[], &[]).unwrap();
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Zèbre", "Atelier"]);
    }

    #[test]
    fn test_deterministic_output() {
        let mut pierre = agent("Pierre", "Martin");
        pierre.leave_days.push("2024-07-10".to_string());
        let agents = vec![pierre];
        let events = vec![event("2024-07-10", "Fête")];
        let tasks = vec![task("Fuite", Some("2024-07-10"), None)];
        let incidents = vec![incident("Panne", "2024-07-10", IncidentState::Unresolved)];

        let first = entries_for_date(date("2024-07-10"), &events, &tasks, &agents, &incidents).unwrap();
        let second = entries_for_date(date("2024-07-10"), &events, &tasks, &agents, &incidents).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_malformed_due_date_is_invalid_input() {
        let tasks = vec![task("Bad", Some("10/07/2024"), None)];
        let result = entries_for_date(date("2024-07-10"), &[], &tasks, &[], &[]);
        assert!(matches!(result, Err(ColonyError::InvalidInput(_))));
    }

    #[test]
    fn test_entries_for_range() {
        let events = vec![event("2024-07-10", "Fête"), event("2024-07-12", "Sortie")];
        let days = entries_for_range(date("2024-07-10"), date("2024-07-12"), &events, &[], &[], &[])
            .unwrap();
        let counts: Vec<usize> = days.iter().map(|d| d.entries.len()).collect();
        assert_eq!(counts, vec![1, 0, 1]);

        assert!(entries_for_range(date("2024-07-12"), date("2024-07-10"), &[], &[], &[], &[]).is_err());
    }
}
