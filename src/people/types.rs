//! Types for the people module
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{parse_iso_date, ColonyError, ColonyResult};
use crate::schedule::DetailedScheduleEntry;

/// Literal written in a weekly slot when the agent does not work that day.
pub const REST_MARKER: &str = "Repos";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    Manager,
    Technical,
    Maintenance,
    #[default]
    Custom,
}

impl RoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Technical => "technical",
            Self::Maintenance => "maintenance",
            Self::Custom => "custom",
        }
    }

    /// Unknown values fall back to `Custom`, the least privileged role.
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "manager" => Self::Manager,
            "technical" => Self::Technical,
            "maintenance" => Self::Maintenance,
            _ => Self::Custom,
        }
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            Self::Manager => "#8b5cf6",
            Self::Technical => "#059669",
            Self::Maintenance => "#2563eb",
            Self::Custom => "#3b82f6",
        }
    }
}

impl std::fmt::Display for RoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Active,
    OnLeave,
    Inactive,
    Upcoming,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Inactive => "inactive",
            Self::Upcoming => "upcoming",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One free-text slot per weekday, e.g. `"08:00-17:00"` or `"Repos"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WeeklySchedule {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

impl WeeklySchedule {
    /// Same hours Monday to Saturday, rest on Sunday.
    pub fn six_days(hours: &str) -> Self {
        Self {
            monday: hours.to_string(),
            tuesday: hours.to_string(),
            wednesday: hours.to_string(),
            thursday: hours.to_string(),
            friday: hours.to_string(),
            saturday: hours.to_string(),
            sunday: REST_MARKER.to_string(),
        }
    }

    pub fn slot(&self, weekday: Weekday) -> &str {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn slot_mut(&mut self, weekday: Weekday) -> &mut String {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    pub fn works_on(&self, weekday: Weekday) -> bool {
        !is_rest_slot(self.slot(weekday))
    }
}

/// Empty, whitespace-only and the rest marker all mean "not working".
pub fn is_rest_slot(slot: &str) -> bool {
    let slot = slot.trim();
    slot.is_empty() || slot.eq_ignore_ascii_case(REST_MARKER)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Display label such as "Agent technique"
    #[serde(default)]
    pub role_label: String,
    #[serde(default)]
    pub role_type: RoleType,
    #[serde(default)]
    pub role_color: String,
    #[serde(default)]
    pub weekly_schedule: WeeklySchedule,
    /// ISO `YYYY-MM-DD` strings
    #[serde(default)]
    pub leave_days: Vec<String>,
    /// Only `Inactive` is honoured as an override; see `derive_status`.
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default)]
    pub manager_notes: Option<String>,
    #[serde(default)]
    pub detailed_schedules: Vec<DetailedScheduleEntry>,
}

impl Agent {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_on_leave(&self, iso_date: &str) -> bool {
        self.leave_days.iter().any(|d| d.trim() == iso_date)
    }
}

/// Every leave day must be a `YYYY-MM-DD` date; anything else would never match.
pub fn validate_leave_days(leave_days: &[String]) -> ColonyResult<()> {
    for day in leave_days {
        parse_iso_date(day)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role_label: String,
    #[serde(default)]
    pub role_type: RoleType,
    pub role_color: Option<String>,
    #[serde(default)]
    pub weekly_schedule: WeeklySchedule,
    #[serde(default)]
    pub leave_days: Vec<String>,
    pub status: Option<AgentStatus>,
    pub manager_notes: Option<String>,
}

impl CreateAgentRequest {
    pub fn validate(&self) -> ColonyResult<()> {
        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            return Err(ColonyError::InvalidInput("agent name is required".to_string()));
        }
        validate_leave_days(&self.leave_days)
    }

    /// Replaces the editable fields of `agent`, keeping its id.
    pub fn apply_to(self, agent: &mut Agent) {
        let id = agent.id;
        *agent = Agent {
            id,
            ..self.into_agent()
        };
    }

    pub fn into_agent(self) -> Agent {
        let role_color = self
            .role_color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.role_type.default_color().to_string());
        Agent {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            role_label: self.role_label,
            role_type: self.role_type,
            role_color,
            weekly_schedule: self.weekly_schedule,
            leave_days: self.leave_days,
            status: self.status.unwrap_or_default(),
            manager_notes: self.manager_notes,
            detailed_schedules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatusView {
    pub agent_id: Uuid,
    pub name: String,
    pub date: chrono::NaiveDate,
    pub status: AgentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(leave_days: &[&str]) -> CreateAgentRequest {
        CreateAgentRequest {
            first_name: "Pierre".to_string(),
            last_name: "Martin".to_string(),
            email: String::new(),
            phone: String::new(),
            role_label: "Agent technique".to_string(),
            role_type: RoleType::Technical,
            role_color: None,
            weekly_schedule: WeeklySchedule::default(),
            leave_days: leave_days.iter().map(|d| d.to_string()).collect(),
            status: None,
            manager_notes: None,
        }
    }

    #[test]
    fn test_leave_days_must_be_iso_dates() {
        assert!(request(&["2024-01-15", " 2024-01-16 "]).validate().is_ok());
        assert!(matches!(
            request(&["2024-01-15", "15/01/2024"]).validate(),
            Err(ColonyError::InvalidInput(_))
        ));
        assert!(request(&["garbage"]).validate().is_err());

        let mut nameless = request(&[]);
        nameless.first_name = " ".to_string();
        nameless.last_name = String::new();
        assert!(nameless.validate().is_err());
    }

    #[test]
    fn test_apply_to_keeps_id() {
        let mut agent = request(&[]).into_agent();
        let id = agent.id;
        let mut edit = request(&["2024-02-01"]);
        edit.first_name = "Paul".to_string();
        edit.apply_to(&mut agent);

        assert_eq!(agent.id, id);
        assert_eq!(agent.first_name, "Paul");
        assert!(agent.is_on_leave("2024-02-01"));
        assert_eq!(agent.role_color, RoleType::Technical.default_color());
    }

    #[test]
    fn test_rest_slot_detection() {
        assert!(is_rest_slot(""));
        assert!(is_rest_slot("   "));
        assert!(is_rest_slot("Repos"));
        assert!(is_rest_slot(" repos "));
        assert!(!is_rest_slot("08:00-17:00"));
    }

    #[test]
    fn test_missing_weekly_slots_deserialize_as_rest() {
        let schedule: WeeklySchedule =
            serde_json::from_str(r#"{ "monday": "08:00-12:00" }"#).unwrap();
        assert!(schedule.works_on(Weekday::Mon));
        assert!(!schedule.works_on(Weekday::Tue));
        assert!(!schedule.works_on(Weekday::Sun));
    }

    #[test]
    fn test_role_from_header() {
        assert_eq!(RoleType::from_header("Manager"), RoleType::Manager);
        assert_eq!(RoleType::from_header("technical"), RoleType::Technical);
        assert_eq!(RoleType::from_header("visitor"), RoleType::Custom);
    }

    #[test]
    fn test_create_request_defaults_color_from_role() {
        let agent = CreateAgentRequest {
            first_name: "Pierre".to_string(),
            last_name: "Martin".to_string(),
            email: String::new(),
            phone: String::new(),
            role_label: "Agent technique".to_string(),
            role_type: RoleType::Technical,
            role_color: None,
            weekly_schedule: WeeklySchedule::six_days("07:00-15:00"),
            leave_days: vec![],
            status: None,
            manager_notes: None,
        }
        .into_agent();

        assert_eq!(agent.role_color, "#059669");
        assert_eq!(agent.status, AgentStatus::Active);
        assert_eq!(agent.display_name(), "Pierre Martin");
    }
}
