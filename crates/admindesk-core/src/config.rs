//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, the token storage backend, and the last
//! email used to log in.
//!
//! Configuration is stored at `~/.config/admindesk/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::auth::{FileStorage, KeyringStorage, MemoryStorage, TokenStorage};

/// Application name used for config/data directory paths
const APP_NAME: &str = "admindesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable carrying the API base URL. It is read at runtime and
/// also captured at build time.
pub const BASE_URL_ENV: &str = "ADMINDESK_API_BASE_URL";

/// Base URL baked in when the crate was built with the variable set.
const BUILD_BASE_URL: Option<&str> = option_env!("ADMINDESK_API_BASE_URL");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON jar in the data directory
    #[default]
    File,
    /// OS keychain
    Keyring,
    /// Process memory only, nothing survives exit
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub storage: StorageBackend,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Resolve the API base URL: runtime environment first, then the value
    /// captured at build time, then the config file.
    pub fn base_url(&self) -> Result<String> {
        let runtime = std::env::var(BASE_URL_ENV).ok();
        Self::pick_base_url(runtime, BUILD_BASE_URL, self.api_base_url.as_deref())
    }

    fn pick_base_url(
        runtime: Option<String>,
        build: Option<&str>,
        file: Option<&str>,
    ) -> Result<String> {
        runtime
            .filter(|url| !url.trim().is_empty())
            .or_else(|| build.map(str::to_string).filter(|url| !url.trim().is_empty()))
            .or_else(|| file.map(str::to_string).filter(|url| !url.trim().is_empty()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API base URL configured. Set {} or api_base_url in the config file",
                    BASE_URL_ENV
                )
            })
    }

    /// Token storage backend selected by this configuration.
    pub fn token_storage(&self) -> Result<Box<dyn TokenStorage>> {
        Ok(match self.storage {
            StorageBackend::File => Box::new(FileStorage::new(self.data_dir()?)),
            StorageBackend::Keyring => Box::new(KeyringStorage::new()),
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_precedence() {
        let url = Config::pick_base_url(
            Some("https://env.example".into()),
            Some("https://build.example"),
            Some("https://file.example"),
        )
        .unwrap();
        assert_eq!(url, "https://env.example");

        let url = Config::pick_base_url(None, None, Some("https://file.example")).unwrap();
        assert_eq!(url, "https://file.example");

        let url = Config::pick_base_url(Some("  ".into()), Some("https://build.example"), None)
            .unwrap();
        assert_eq!(url, "https://build.example");

        assert!(Config::pick_base_url(None, None, None).is_err());
    }

    #[test]
    fn test_parse_config_defaults_storage() {
        let config: Config =
            serde_json::from_str(r#"{"api_base_url":"https://api.example","last_email":null}"#)
                .unwrap();
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.api_base_url.as_deref(), Some("https://api.example"));
    }
}
