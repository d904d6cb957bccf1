use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{ColonyError, ColonyResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Task,
    Leave,
    Maintenance,
    Event,
}

impl EventKind {
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Task => "📋",
            Self::Leave => "🏖️",
            Self::Maintenance => "🔧",
            Self::Event => "🎉",
        }
    }
}

/// An explicit entry created on the calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: EventKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub agent_id: Option<Uuid>,
    /// Expected number of children; only meaningful for `EventKind::Event`
    #[serde(default)]
    pub child_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCalendarEventRequest {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub agent_id: Option<Uuid>,
    pub child_count: Option<u32>,
}

impl CreateCalendarEventRequest {
    pub fn into_event(self) -> ColonyResult<CalendarEvent> {
        if self.title.trim().is_empty() {
            return Err(ColonyError::InvalidInput("event title is required".to_string()));
        }
        let child_count = match self.kind {
            EventKind::Event => self.child_count,
            _ => None,
        };
        Ok(CalendarEvent {
            id: Uuid::new_v4(),
            date: self.date,
            kind: self.kind,
            title: self.title,
            description: self.description,
            agent_id: self.agent_id,
            child_count,
        })
    }
}

/// Which collection a day entry was derived from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DayEntrySource {
    CalendarEvent,
    Task,
    Leave,
    Schedule,
    Incident,
}

/// A display-ready line in the unified day view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayEntry {
    pub id: String,
    pub date: NaiveDate,
    pub source: DayEntrySource,
    pub kind: EventKind,
    pub marker: String,
    pub title: String,
    pub description: String,
    pub agent_id: Option<Uuid>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub entries: Vec<DayEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub in_current_month: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub entry_count: usize,
}
