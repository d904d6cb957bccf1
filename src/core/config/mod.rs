//! Application configuration
//!
//! Layered as: built-in defaults, then an optional `colonyops.toml`, then
//! `COLONY_`-prefixed environment variables (`COLONY_SERVER__PORT=9000`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "colonyops.toml";
pub const ENV_PREFIX: &str = "COLONY_";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub facility: FacilityConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FacilityConfig {
    /// Load the sample roster and buildings into an empty store
    pub seed_demo_data: bool,
    /// Buffered change notifications per subscriber before lagging
    pub change_channel_capacity: usize,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
            change_channel_capacity: 64,
        }
    }
}

impl AppConfig {
    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(config_file: &Path) -> Result<Self, figment::Error> {
        let config: AppConfig = Self::figment(config_file).extract()?;
        debug!(
            "Loaded configuration: {}:{} (seed demo data: {})",
            config.server.host, config.server.port, config.facility.seed_demo_data
        );
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert!(config.facility.seed_demo_data);
        assert_eq!(config.facility.change_channel_capacity, 64);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nhost = \"127.0.0.1\"\nport = 9100\n").unwrap();
        writeln!(file, "[facility]\nseed_demo_data = false\nchange_channel_capacity = 8").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9100");
        assert!(!config.facility.seed_demo_data);
        assert_eq!(config.facility.change_channel_capacity, 8);
    }
}
