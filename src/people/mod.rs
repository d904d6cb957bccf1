//! Agents, their weekly hours, leave and derived daily status.

pub mod status;
pub mod types;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use log::info;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

pub use status::{derive_status, derive_status_for};
pub use types::*;

use crate::core::error::{parse_iso_date, ColonyError, ColonyResult};
use crate::core::shared::state::{acting_permissions, AppState};
use crate::core::urls::ApiUrls;
use crate::schedule::{
    schedules_for_agent, CreateScheduleRequest, DetailedScheduleEntry, UpdateScheduleRequest,
};
use crate::storage::StorageAccessor;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

impl DateQuery {
    /// Requested day, today when absent.
    pub fn resolve(&self) -> ColonyResult<NaiveDate> {
        match self.date.as_deref() {
            Some(raw) => parse_iso_date(raw),
            None => Ok(Utc::now().date_naive()),
        }
    }
}

pub fn status_view(agent: &Agent, date: NaiveDate) -> AgentStatusView {
    AgentStatusView {
        agent_id: agent.id,
        name: agent.display_name(),
        date,
        status: derive_status(agent, date),
    }
}

/// Derived status of every agent for one day, in roster order.
pub fn roster_statuses<S: StorageAccessor + ?Sized>(store: &S, date: NaiveDate) -> Vec<AgentStatusView> {
    store
        .list_agents()
        .iter()
        .map(|agent| status_view(agent, date))
        .collect()
}

// HTTP Handlers

pub async fn list_agents(State(state): State<Arc<AppState>>) -> Json<Vec<Agent>> {
    let store = state.store.read().await;
    Json(store.list_agents())
}

pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<Agent>), ColonyError> {
    if !acting_permissions(&headers).can_edit_agents {
        return Err(ColonyError::Forbidden("only managers edit agents".to_string()));
    }
    req.validate()?;
    let mut store = state.store.write().await;
    let agent = store.create_agent(req.into_agent())?;
    Ok((StatusCode::CREATED, Json(agent)))
}

pub async fn update_agent(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateAgentRequest>,
) -> Result<Json<Agent>, ColonyError> {
    if !acting_permissions(&headers).can_edit_agents {
        return Err(ColonyError::Forbidden("only managers edit agents".to_string()));
    }
    req.validate()?;
    let mut store = state.store.write().await;
    let agent = store.update_agent(id, |agent| req.apply_to(agent))?;
    Ok(Json(agent))
}

pub async fn delete_agent(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ColonyError> {
    if !acting_permissions(&headers).can_edit_agents {
        return Err(ColonyError::Forbidden("only managers edit agents".to_string()));
    }
    let mut store = state.store.write().await;
    store.delete_agent(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Agent>, ColonyError> {
    let store = state.store.read().await;
    Ok(Json(store.agent(id)?))
}

pub async fn agent_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<Json<AgentStatusView>, ColonyError> {
    let date = query.resolve()?;
    let store = state.store.read().await;
    let agent = store.agent(id)?;
    Ok(Json(status_view(&agent, date)))
}

pub async fn agent_statuses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<AgentStatusView>>, ColonyError> {
    let date = query.resolve()?;
    let store = state.store.read().await;
    Ok(Json(roster_statuses(&*store, date)))
}

pub async fn agent_schedules(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<DetailedScheduleEntry>>, ColonyError> {
    let date = query.date.as_deref().map(parse_iso_date).transpose()?;
    let store = state.store.read().await;
    let agent = store.agent(id)?;
    Ok(Json(schedules_for_agent(&agent.detailed_schedules, id, date)))
}

pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Vec<DetailedScheduleEntry>>), ColonyError> {
    if !acting_permissions(&headers).can_edit_planning {
        return Err(ColonyError::Forbidden("only managers edit the planning".to_string()));
    }
    let template = DetailedScheduleEntry::from(req);
    let mut store = state.store.write().await;
    let stored = store.add_schedule(template)?;
    info!("Planning updated with {} entries", stored.len());
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateScheduleRequest>,
) -> Result<Json<DetailedScheduleEntry>, ColonyError> {
    if !acting_permissions(&headers).can_edit_planning {
        return Err(ColonyError::Forbidden("only managers edit the planning".to_string()));
    }
    let mut store = state.store.write().await;
    let entry = store.update_schedule(id, |entry| req.apply_to(entry))?;
    Ok(Json(entry))
}

pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ColonyError> {
    if !acting_permissions(&headers).can_edit_planning {
        return Err(ColonyError::Forbidden("only managers edit the planning".to_string()));
    }
    let mut store = state.store.write().await;
    store.delete_schedule(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn configure_people_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::AGENTS, get(list_agents).post(create_agent))
        .route(ApiUrls::AGENT_STATUSES, get(agent_statuses))
        .route(
            ApiUrls::AGENT_BY_ID,
            get(get_agent).put(update_agent).delete(delete_agent),
        )
        .route(ApiUrls::AGENT_STATUS, get(agent_status))
        .route(ApiUrls::AGENT_SCHEDULES, get(agent_schedules))
        .route(ApiUrls::SCHEDULES, post(create_schedule))
        .route(
            ApiUrls::SCHEDULE_BY_ID,
            put(update_schedule).delete(delete_schedule),
        )
}
