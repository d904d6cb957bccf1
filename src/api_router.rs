//! API Router
//!
//! Combines the routes of every module into one router.

use axum::{routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::core::shared::state::AppState;
use crate::core::urls::ApiUrls;

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": env!("CARGO_PKG_NAME") }))
}

/// Configure all API routes from all modules
pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::HEALTH, get(health_check))
        .merge(crate::people::configure_people_routes())
        .merge(crate::calendar::configure_calendar_routes())
        .merge(crate::tasks::configure_tasks_routes())
        .merge(crate::incidents::configure_incidents_routes())
        .merge(crate::messages::configure_messages_routes())
        .merge(crate::facility::configure_facility_routes())
        .merge(crate::settings::configure_settings_routes())
}

/// Routes bound to a state, ready to serve.
pub fn build_app(state: Arc<AppState>) -> Router {
    configure_api_routes().with_state(state)
}
