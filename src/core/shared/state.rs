use axum::http::HeaderMap;
use tokio::sync::RwLock;

use crate::core::config::AppConfig;
use crate::core::events::ChangeNotifier;
use crate::core::urls::ROLE_HEADER;
use crate::people::RoleType;
use crate::settings::{permissions_for, Permissions};
use crate::storage::DataStore;

pub struct AppState {
    pub config: AppConfig,
    pub store: RwLock<DataStore>,
    pub notifier: ChangeNotifier,
}

impl AppState {
    pub fn new(config: AppConfig, store: DataStore) -> Self {
        let notifier = store.notifier().clone();
        Self {
            config,
            store: RwLock::new(store),
            notifier,
        }
    }

    /// Empty store, or the demo roster when `facility.seed_demo_data` is set.
    pub fn from_config(config: AppConfig) -> Self {
        let notifier = ChangeNotifier::new(config.facility.change_channel_capacity);
        #[cfg(feature = "demo-data")]
        let store = if config.facility.seed_demo_data {
            crate::storage::seed::demo_store(notifier)
        } else {
            DataStore::new(notifier)
        };
        #[cfg(not(feature = "demo-data"))]
        let store = DataStore::new(notifier);
        Self::new(config, store)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("subscribers", &self.notifier.subscriber_count())
            .finish_non_exhaustive()
    }
}

/// Role claimed by the caller; missing or unknown means `Custom`.
pub fn acting_role(headers: &HeaderMap) -> RoleType {
    headers
        .get(ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(RoleType::from_header)
        .unwrap_or_default()
}

pub fn acting_permissions(headers: &HeaderMap) -> Permissions {
    permissions_for(acting_role(headers))
}
