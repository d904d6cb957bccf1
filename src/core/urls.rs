#[derive(Debug)]
pub struct ApiUrls;

impl ApiUrls {
    // People
    pub const AGENTS: &'static str = "/api/agents";
    pub const AGENT_BY_ID: &'static str = "/api/agents/{id}";
    pub const AGENT_STATUS: &'static str = "/api/agents/{id}/status";
    pub const AGENT_STATUSES: &'static str = "/api/agents/statuses";
    pub const AGENT_SCHEDULES: &'static str = "/api/agents/{id}/schedules";

    // Detailed schedules
    pub const SCHEDULES: &'static str = "/api/schedules";
    pub const SCHEDULE_BY_ID: &'static str = "/api/schedules/{id}";

    // Calendar
    pub const CALENDAR_DAY: &'static str = "/api/calendar/day/{date}";
    pub const CALENDAR_MONTH: &'static str = "/api/calendar/month/{year}/{month}";
    pub const CALENDAR_EVENTS: &'static str = "/api/calendar/events";
    pub const CALENDAR_EVENT_BY_ID: &'static str = "/api/calendar/events/{id}";

    // Tasks
    pub const TASKS: &'static str = "/api/tasks";
    pub const TASK_BY_ID: &'static str = "/api/tasks/{id}";
    pub const TASK_STATUS: &'static str = "/api/tasks/{id}/status";
    pub const TASKS_BULK_ASSIGN: &'static str = "/api/tasks/bulk-assign";

    // Incidents
    pub const INCIDENTS: &'static str = "/api/incidents";
    pub const INCIDENT_STATE: &'static str = "/api/incidents/{id}/state";

    // Messages
    pub const MESSAGES: &'static str = "/api/messages";
    pub const MESSAGE_BY_ID: &'static str = "/api/messages/{id}";

    // Facility
    pub const BUILDINGS: &'static str = "/api/buildings";
    pub const BUILDING_BY_ID: &'static str = "/api/buildings/{id}";
    pub const SETTINGS: &'static str = "/api/settings";
    pub const PERMISSIONS: &'static str = "/api/permissions";

    pub const HEALTH: &'static str = "/health";
}

/// Header carrying the caller's role. Authentication lives upstream.
pub const ROLE_HEADER: &str = "x-colony-role";
