//! Technical incidents reported by staff.
//!
//! Anyone may report; state changes are limited to roles with
//! `can_update_incident_status`.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{ColonyError, ColonyResult};
use crate::core::shared::state::{acting_permissions, AppState};
use crate::core::urls::ApiUrls;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IncidentState {
    #[default]
    Unresolved,
    InProgress,
    Resolved,
}

impl IncidentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub room: String,
    pub reported_by: String,
    pub reported_at: DateTime<Utc>,
    #[serde(default)]
    pub state: IncidentState,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    /// Set when someone takes ownership
    #[serde(default)]
    pub agent_id: Option<Uuid>,
}

impl Incident {
    pub fn is_open(&self) -> bool {
        self.state != IncidentState::Resolved
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportIncidentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub room: String,
    pub reported_by: String,
}

impl ReportIncidentRequest {
    pub fn into_incident(self, now: DateTime<Utc>) -> ColonyResult<Incident> {
        if self.title.trim().is_empty() {
            return Err(ColonyError::InvalidInput("incident title is required".to_string()));
        }
        Ok(Incident {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            building: self.building,
            room: self.room,
            reported_by: self.reported_by,
            reported_at: now,
            state: IncidentState::Unresolved,
            resolved_at: None,
            agent_id: None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentStateUpdate {
    pub state: IncidentState,
    /// Agent performing the change; becomes the assignee when taking an
    /// unowned incident in hand.
    pub acting_agent: Option<Uuid>,
}

/// Moves an incident to `next`, stamping the resolution time and taking
/// ownership as needed.
pub fn apply_transition(
    incident: &mut Incident,
    next: IncidentState,
    acting_agent: Option<Uuid>,
    now: DateTime<Utc>,
) {
    match next {
        IncidentState::Resolved => incident.resolved_at = Some(now),
        IncidentState::InProgress => {
            incident.resolved_at = None;
            if incident.agent_id.is_none() {
                incident.agent_id = acting_agent;
            }
        }
        IncidentState::Unresolved => incident.resolved_at = None,
    }
    incident.state = next;
}

// HTTP Handlers

pub async fn list_incidents(State(state): State<Arc<AppState>>) -> Json<Vec<Incident>> {
    let store = state.store.read().await;
    Json(store.incidents.list().to_vec())
}

pub async fn report_incident(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ReportIncidentRequest>,
) -> Result<(StatusCode, Json<Incident>), ColonyError> {
    if !acting_permissions(&headers).can_report_incidents {
        return Err(ColonyError::Forbidden("reporting incidents is not allowed".to_string()));
    }
    let incident = req.into_incident(Utc::now())?;
    info!("Incident reported: {} ({})", incident.title, incident.building);

    let mut store = state.store.write().await;
    let incident = store.create_incident(incident)?;
    Ok((StatusCode::CREATED, Json(incident)))
}

pub async fn update_incident_state(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(update): Json<IncidentStateUpdate>,
) -> Result<Json<Incident>, ColonyError> {
    if !acting_permissions(&headers).can_update_incident_status {
        return Err(ColonyError::Forbidden(
            "only managers and technical agents change incident state".to_string(),
        ));
    }
    let now = Utc::now();
    let mut store = state.store.write().await;
    let incident = store.update_incident(id, |incident| {
        apply_transition(incident, update.state, update.acting_agent, now)
    })?;
    Ok(Json(incident))
}

pub fn configure_incidents_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::INCIDENTS, get(list_incidents).post(report_incident))
        .route(ApiUrls::INCIDENT_STATE, put(update_incident_state))
}
