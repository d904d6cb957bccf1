pub mod rbac;

use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use rbac::{permissions_for, Permissions};

use crate::core::error::{ColonyError, ColonyResult};
use crate::core::shared::state::{acting_permissions, AppState};
use crate::core::urls::ApiUrls;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotificationSettings {
    pub email: bool,
    pub sms: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
        }
    }
}

/// Facility-wide preferences edited from the settings page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FacilitySettings {
    pub camp_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub max_capacity: u32,
    pub theme_color: String,
    pub notifications: NotificationSettings,
    pub language: String,
    pub timezone: String,
    pub date_format: String,
    pub time_format: String,
    pub session_minutes: u32,
}

impl Default for FacilitySettings {
    fn default() -> Self {
        Self {
            camp_name: "Colonie de Vacances".to_string(),
            address: "123 Rue de la Nature, 12345 Ville".to_string(),
            phone: "+33 1 23 45 67 89".to_string(),
            email: "contact@colonie.fr".to_string(),
            max_capacity: 100,
            theme_color: "#3b82f6".to_string(),
            notifications: NotificationSettings::default(),
            language: "fr".to_string(),
            timezone: "Europe/Paris".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            time_format: "24h".to_string(),
            session_minutes: 480,
        }
    }
}

impl FacilitySettings {
    pub fn validate(&self) -> ColonyResult<()> {
        if self.camp_name.trim().is_empty() {
            return Err(ColonyError::InvalidInput("camp name is required".to_string()));
        }
        if self.max_capacity == 0 {
            return Err(ColonyError::InvalidInput(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.session_minutes == 0 {
            return Err(ColonyError::InvalidInput(
                "session length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<FacilitySettings> {
    let store = state.store.read().await;
    Json(store.settings.clone())
}

pub async fn replace_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(settings): Json<FacilitySettings>,
) -> Result<Json<FacilitySettings>, ColonyError> {
    if !acting_permissions(&headers).can_access_settings {
        return Err(ColonyError::Forbidden("settings are manager-only".to_string()));
    }
    let mut store = state.store.write().await;
    Ok(Json(store.replace_settings(settings)?))
}

pub fn configure_settings_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::SETTINGS, get(get_settings).put(replace_settings))
        .merge(rbac::configure_rbac_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = FacilitySettings::default();
        assert_eq!(settings.max_capacity, 100);
        assert_eq!(settings.timezone, "Europe/Paris");
        assert!(settings.notifications.email);
        assert!(!settings.notifications.sms);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings: FacilitySettings =
            serde_json::from_str(r#"{ "camp_name": "Les Pins", "max_capacity": 60 }"#).unwrap();
        assert_eq!(settings.camp_name, "Les Pins");
        assert_eq!(settings.max_capacity, 60);
        assert_eq!(settings.language, "fr");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let settings = FacilitySettings {
            max_capacity: 0,
            ..FacilitySettings::default()
        };
        assert!(matches!(settings.validate(), Err(ColonyError::InvalidInput(_))));
    }
}
