//! Calendar Module
//!
//! Unified day view over explicit events, task deadlines, leave, shifts and
//! open incidents, plus the month grid used to lay it out.

pub mod aggregate;
pub mod grid;
pub mod types;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

pub use aggregate::{entries_for_date, entries_for_range};
pub use grid::month_grid;
pub use types::{
    CalendarEvent, CreateCalendarEventRequest, DayEntry, DayEntrySource, DaySummary, EventKind,
    GridDay, MonthCell,
};

use crate::core::error::{parse_iso_date, ColonyError, ColonyResult};
use crate::core::shared::state::{acting_permissions, AppState};
use crate::core::urls::ApiUrls;
use crate::storage::StorageAccessor;

/// Day view read through the storage accessor.
pub fn day_view<S: StorageAccessor + ?Sized>(
    store: &S,
    date: chrono::NaiveDate,
) -> ColonyResult<DaySummary> {
    let entries = entries_for_date(
        date,
        &store.list_calendar_events(),
        &store.list_tasks(),
        &store.list_agents(),
        &store.list_incidents(),
    )?;
    Ok(DaySummary { date, entries })
}

/// Month grid with the number of day entries behind each cell.
pub fn month_view<S: StorageAccessor + ?Sized>(
    store: &S,
    year: i32,
    month: u32,
) -> ColonyResult<Vec<MonthCell>> {
    let grid = month_grid(year, month)?;
    let (Some(first), Some(last)) = (grid.first(), grid.last()) else {
        return Ok(Vec::new());
    };

    let days = entries_for_range(
        first.date,
        last.date,
        &store.list_calendar_events(),
        &store.list_tasks(),
        &store.list_agents(),
        &store.list_incidents(),
    )?;

    Ok(grid
        .iter()
        .zip(days)
        .map(|(cell, day)| MonthCell {
            date: cell.date,
            in_current_month: cell.in_current_month,
            entry_count: day.entries.len(),
        })
        .collect())
}

// HTTP Handlers

pub async fn get_day(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<DaySummary>, ColonyError> {
    let date = parse_iso_date(&date)?;
    let store = state.store.read().await;
    Ok(Json(day_view(&*store, date)?))
}

pub async fn get_month(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<Vec<MonthCell>>, ColonyError> {
    let store = state.store.read().await;
    Ok(Json(month_view(&*store, year, month)?))
}

pub async fn list_events(State(state): State<Arc<AppState>>) -> Json<Vec<CalendarEvent>> {
    let store = state.store.read().await;
    Json(store.calendar_events.list().to_vec())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateCalendarEventRequest>,
) -> Result<(StatusCode, Json<CalendarEvent>), ColonyError> {
    if !acting_permissions(&headers).can_edit_calendar {
        return Err(ColonyError::Forbidden("calendar is read-only for this role".to_string()));
    }
    let event = req.into_event()?;
    let mut store = state.store.write().await;
    let event = store.create_calendar_event(event)?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CreateCalendarEventRequest>,
) -> Result<Json<CalendarEvent>, ColonyError> {
    if !acting_permissions(&headers).can_edit_calendar {
        return Err(ColonyError::Forbidden("calendar is read-only for this role".to_string()));
    }
    let edited = req.into_event()?;
    let mut store = state.store.write().await;
    let event = store.update_calendar_event(id, |event| {
        *event = CalendarEvent {
            id: event.id,
            ..edited
        }
    })?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, ColonyError> {
    if !acting_permissions(&headers).can_edit_calendar {
        return Err(ColonyError::Forbidden("calendar is read-only for this role".to_string()));
    }
    let mut store = state.store.write().await;
    store.delete_calendar_event(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn configure_calendar_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::CALENDAR_DAY, get(get_day))
        .route(ApiUrls::CALENDAR_MONTH, get(get_month))
        .route(ApiUrls::CALENDAR_EVENTS, get(list_events).post(create_event))
        .route(
            ApiUrls::CALENDAR_EVENT_BY_ID,
            put(update_event).delete(delete_event),
        )
}
