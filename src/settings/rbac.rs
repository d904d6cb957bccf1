//! Capability table per role.
//!
//! Handlers ask `permissions_for` instead of comparing role names, so a new
//! role only needs a row here.

use axum::{http::HeaderMap, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::shared::state::{acting_role, AppState};
use crate::core::urls::ApiUrls;
use crate::people::RoleType;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permissions {
    pub can_edit_agents: bool,
    pub can_edit_tasks: bool,
    pub can_edit_planning: bool,
    pub can_edit_calendar: bool,
    pub can_moderate_messages: bool,
    pub can_update_incident_status: bool,
    pub can_report_incidents: bool,
    pub can_post_messages: bool,
    pub can_access_settings: bool,
}

impl Permissions {
    pub fn all() -> Self {
        Self {
            can_edit_agents: true,
            can_edit_tasks: true,
            can_edit_planning: true,
            can_edit_calendar: true,
            can_moderate_messages: true,
            can_update_incident_status: true,
            can_report_incidents: true,
            can_post_messages: true,
            can_access_settings: true,
        }
    }

    /// What every staff member may do.
    pub fn staff() -> Self {
        Self {
            can_report_incidents: true,
            can_post_messages: true,
            ..Self::default()
        }
    }
}

pub fn permissions_for(role: RoleType) -> Permissions {
    match role {
        RoleType::Manager => Permissions::all(),
        RoleType::Technical => Permissions {
            can_update_incident_status: true,
            ..Permissions::staff()
        },
        RoleType::Maintenance | RoleType::Custom => Permissions::staff(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionsResponse {
    pub role: RoleType,
    pub permissions: Permissions,
}

async fn get_permissions(headers: HeaderMap) -> Json<PermissionsResponse> {
    let role = acting_role(&headers);
    Json(PermissionsResponse {
        role,
        permissions: permissions_for(role),
    })
}

pub fn configure_rbac_routes() -> Router<Arc<AppState>> {
    Router::new().route(ApiUrls::PERMISSIONS, get(get_permissions))
}
