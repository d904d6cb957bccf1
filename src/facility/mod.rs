//! Buildings and their rooms, edited as a unit by the manager.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{ColonyError, ColonyResult};
use crate::core::shared::state::{acting_permissions, AppState};
use crate::core::urls::ApiUrls;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Bedroom,
    CommonRoom,
    Kitchen,
    Office,
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub room_type: RoomType,
    #[serde(default)]
    pub agent_id: Option<Uuid>,
    #[serde(default)]
    pub assigned_task: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Building {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Building {
    pub fn rooms_for_agent(&self, agent_id: Uuid) -> impl Iterator<Item = &Room> {
        self.rooms
            .iter()
            .filter(move |room| room.agent_id == Some(agent_id))
    }
}

/// Body for creating or replacing a building; rooms travel with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl BuildingRequest {
    pub fn validate(&self) -> ColonyResult<()> {
        if self.name.trim().is_empty() {
            return Err(ColonyError::InvalidInput("building name is required".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.rooms.iter().find(|room| !seen.insert(room.id.as_str())) {
            return Err(ColonyError::InvalidInput(format!(
                "room id {} appears twice in {}",
                dup.id, self.name
            )));
        }
        Ok(())
    }

    pub fn into_building(self) -> Building {
        Building {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            color: self.color,
            created_at: Utc::now(),
            rooms: self.rooms,
        }
    }
}

/// Every room handled by an agent across all buildings, as `(building, room)`.
pub fn assignments_for_agent(buildings: &[Building], agent_id: Uuid) -> Vec<(&Building, &Room)> {
    buildings
        .iter()
        .flat_map(|b| b.rooms_for_agent(agent_id).map(move |r| (b, r)))
        .collect()
}

pub async fn list_buildings(State(state): State<Arc<AppState>>) -> Json<Vec<Building>> {
    let store = state.store.read().await;
    Json(store.buildings.list().to_vec())
}

pub async fn get_building(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Building>, ColonyError> {
    let store = state.store.read().await;
    Ok(Json(store.buildings.require(id)?.clone()))
}

pub async fn create_building(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<BuildingRequest>,
) -> Result<(StatusCode, Json<Building>), ColonyError> {
    if !acting_permissions(&headers).can_edit_planning {
        return Err(ColonyError::Forbidden("only managers edit buildings".to_string()));
    }
    req.validate()?;
    let mut store = state.store.write().await;
    let building = store.create_building(req.into_building())?;
    Ok((StatusCode::CREATED, Json(building)))
}

pub async fn update_building(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<BuildingRequest>,
) -> Result<Json<Building>, ColonyError> {
    if !acting_permissions(&headers).can_edit_planning {
        return Err(ColonyError::Forbidden("only managers edit buildings".to_string()));
    }
    req.validate()?;
    let mut store = state.store.write().await;
    let building = store.update_building(id, |building| {
        building.name = req.name;
        building.description = req.description;
        building.color = req.color;
        building.rooms = req.rooms;
    })?;
    Ok(Json(building))
}

pub async fn delete_building(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ColonyError> {
    if !acting_permissions(&headers).can_edit_planning {
        return Err(ColonyError::Forbidden("only managers edit buildings".to_string()));
    }
    let mut store = state.store.write().await;
    store.delete_building(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn configure_facility_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::BUILDINGS, get(list_buildings).post(create_building))
        .route(
            ApiUrls::BUILDING_BY_ID,
            get(get_building).put(update_building).delete(delete_building),
        )
}
