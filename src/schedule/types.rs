use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    #[default]
    OneOff,
    Recurring,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    Planned,
    Confirmed,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recurrence {
    pub frequency: Frequency,
    /// Days of the week for weekly rules, 0 = Sunday through 6 = Saturday.
    #[serde(default)]
    pub weekdays: Option<Vec<u8>>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_occurrences: Option<u32>,
}

impl Recurrence {
    pub fn daily(max_occurrences: u32) -> Self {
        Self {
            frequency: Frequency::Daily,
            weekdays: None,
            end_date: None,
            max_occurrences: Some(max_occurrences),
        }
    }

    pub fn weekly(weekdays: Vec<u8>) -> Self {
        Self {
            frequency: Frequency::Weekly,
            weekdays: Some(weekdays),
            end_date: None,
            max_occurrences: None,
        }
    }

    pub fn monthly() -> Self {
        Self {
            frequency: Frequency::Monthly,
            weekdays: None,
            end_date: None,
            max_occurrences: None,
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

/// A date-specific shift for one agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailedScheduleEntry {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub break_start: Option<NaiveTime>,
    #[serde(default)]
    pub break_end: Option<NaiveTime>,
    #[serde(default)]
    pub kind: ScheduleKind,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default)]
    pub notes: Option<String>,
    /// Id of the recurring template this occurrence was expanded from
    #[serde(default)]
    pub series_id: Option<Uuid>,
}

impl DetailedScheduleEntry {
    pub fn one_off(agent_id: Uuid, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id,
            date,
            start_time: start,
            end_time: end,
            break_start: None,
            break_end: None,
            kind: ScheduleKind::OneOff,
            recurrence: None,
            status: ScheduleStatus::Planned,
            notes: None,
            series_id: None,
        }
    }

    pub fn recurring(
        agent_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            kind: ScheduleKind::Recurring,
            recurrence: Some(recurrence),
            ..Self::one_off(agent_id, date, start, end)
        }
    }

    /// `"08:00 - 17:00"`
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub agent_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    #[serde(default)]
    pub kind: ScheduleKind,
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub status: ScheduleStatus,
    pub notes: Option<String>,
}

impl From<CreateScheduleRequest> for DetailedScheduleEntry {
    fn from(req: CreateScheduleRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id: req.agent_id,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            break_start: req.break_start,
            break_end: req.break_end,
            kind: req.kind,
            recurrence: req.recurrence,
            status: req.status,
            notes: req.notes,
            series_id: None,
        }
    }
}

/// Edits one stored entry. Occurrences are edited one by one; the rule that
/// produced them is not re-expanded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub status: Option<ScheduleStatus>,
    pub notes: Option<String>,
}

impl UpdateScheduleRequest {
    pub fn apply_to(self, entry: &mut DetailedScheduleEntry) {
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(start) = self.start_time {
            entry.start_time = start;
        }
        if let Some(end) = self.end_time {
            entry.end_time = end;
        }
        if self.break_start.is_some() {
            entry.break_start = self.break_start;
        }
        if self.break_end.is_some() {
            entry.break_end = self.break_end;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
        if self.notes.is_some() {
            entry.notes = self.notes;
        }
    }
}
