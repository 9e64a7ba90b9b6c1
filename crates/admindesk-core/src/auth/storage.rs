//! Durable, cookie-like token records and the backends that hold them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Jar file name in the data directory
const JAR_FILE: &str = "tokens.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// A single persisted token, stored with the same attributes a browser
/// cookie would carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedToken {
    pub value: String,
    pub path: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age_secs: i64,
    pub stored_at: DateTime<Utc>,
}

impl PersistedToken {
    /// Build a record scoped to `/`, secure and same-site strict.
    pub fn new(value: &str, max_age_secs: i64) -> Self {
        Self {
            value: value.to_string(),
            path: "/".to_string(),
            secure: true,
            same_site: SameSite::Strict,
            max_age_secs,
            stored_at: Utc::now(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.stored_at + Duration::seconds(self.max_age_secs)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at()
    }
}

/// Backend holding persisted token records by name.
///
/// Removing a name that is not present must succeed.
pub trait TokenStorage: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<PersistedToken>>;
    fn set(&self, name: &str, record: PersistedToken) -> Result<()>;
    fn remove(&self, name: &str) -> Result<()>;
}

/// In-process storage. Clones share the same records, which is how tests
/// model two browser tabs writing the same cookies.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<Mutex<HashMap<String, PersistedToken>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, PersistedToken>>> {
        self.records
            .lock()
            .map_err(|_| anyhow::anyhow!("Token storage lock poisoned"))
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, name: &str) -> Result<Option<PersistedToken>> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn set(&self, name: &str, record: PersistedToken) -> Result<()> {
        self.lock()?.insert(name.to_string(), record);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.lock()?.remove(name);
        Ok(())
    }
}

/// JSON jar on disk, one file holding every record.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn jar_path(&self) -> PathBuf {
        self.data_dir.join(JAR_FILE)
    }

    fn read_jar(&self) -> Result<HashMap<String, PersistedToken>> {
        let path = self.jar_path();
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&path)
            .context("Failed to read token jar")?;
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&contents).context("Failed to parse token jar")
    }

    fn write_jar(&self, jar: &HashMap<String, PersistedToken>) -> Result<()> {
        let path = self.jar_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(jar)?;
        std::fs::write(&path, contents).context("Failed to write token jar")?;
        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, name: &str) -> Result<Option<PersistedToken>> {
        Ok(self.read_jar()?.remove(name))
    }

    fn set(&self, name: &str, record: PersistedToken) -> Result<()> {
        let mut jar = self.read_jar()?;
        jar.insert(name.to_string(), record);
        self.write_jar(&jar)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let mut jar = self.read_jar()?;
        if jar.remove(name).is_some() {
            self.write_jar(&jar)?;
        }
        Ok(())
    }
}
