use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::storage::{MemoryStorage, PersistedToken, TokenStorage};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Access tokens live for one hour.
pub const ACCESS_TOKEN_MAX_AGE_SECS: i64 = 60 * 60;

/// Refresh tokens live for one week.
pub const REFRESH_TOKEN_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// In-memory view of the current token pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Single source of truth for the session's two tokens.
///
/// Durable storage is authoritative; the mirror is reconciled against it on
/// every read so writes made by another process show up here.
pub struct TokenStore {
    storage: Box<dyn TokenStorage>,
    mirror: RwLock<Session>,
}

impl TokenStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        let store = Self {
            storage,
            mirror: RwLock::new(Session::default()),
        };
        store.reconcile();
        store
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Overwrite both tokens. Token content is opaque and not validated.
    pub fn set_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        self.storage.set(
            ACCESS_TOKEN_KEY,
            PersistedToken::new(access, ACCESS_TOKEN_MAX_AGE_SECS),
        )?;
        self.storage.set(
            REFRESH_TOKEN_KEY,
            PersistedToken::new(refresh, REFRESH_TOKEN_MAX_AGE_SECS),
        )?;

        let mut mirror = self.write_mirror();
        mirror.access_token = Some(access.to_string());
        mirror.refresh_token = Some(refresh.to_string());
        debug!("Tokens stored");
        Ok(())
    }

    /// Remove both tokens. Calling this with no session is a no-op.
    ///
    /// The mirror is cleared before storage is touched, so even on a storage
    /// error this process no longer holds either token.
    pub fn clear_tokens(&self) -> Result<()> {
        *self.write_mirror() = Session::default();
        self.storage.remove(ACCESS_TOKEN_KEY)?;
        self.storage.remove(REFRESH_TOKEN_KEY)?;
        debug!("Tokens cleared");
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.reconcile();
        self.read_mirror().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.reconcile();
        self.read_mirror().refresh_token.clone()
    }

    pub fn session(&self) -> Session {
        self.reconcile();
        self.read_mirror().clone()
    }

    /// Poll durable storage and replace mirror values that diverge.
    /// Returns true when the mirror changed.
    pub fn reconcile(&self) -> bool {
        let access = match self.load(ACCESS_TOKEN_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to read access token from storage");
                return false;
            }
        };
        let refresh = match self.load(REFRESH_TOKEN_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to read refresh token from storage");
                return false;
            }
        };

        let mut mirror = self.write_mirror();
        let mut changed = false;
        if mirror.access_token != access {
            mirror.access_token = access;
            changed = true;
        }
        if mirror.refresh_token != refresh {
            mirror.refresh_token = refresh;
            changed = true;
        }
        if changed {
            debug!("Token mirror reconciled with storage");
        }
        changed
    }

    fn load(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(name)?
            .filter(|record| !record.is_expired())
            .map(|record| record.value))
    }

    fn read_mirror(&self) -> RwLockReadGuard<'_, Session> {
        self.mirror.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_mirror(&self) -> RwLockWriteGuard<'_, Session> {
        self.mirror.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.read_mirror();
        f.debug_struct("TokenStore")
            .field("has_access_token", &session.access_token.is_some())
            .field("has_refresh_token", &session.refresh_token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn test_reads_return_last_set_values() {
        let store = TokenStore::in_memory();
        store.set_tokens("a1", "r1").unwrap();
        store.set_tokens("a2", "r2").unwrap();
        assert_eq!(store.access_token().as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().as_deref(), Some("r2"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = TokenStore::in_memory();
        store.clear_tokens().unwrap();
        assert!(store.session().is_empty());

        store.set_tokens("a", "r").unwrap();
        store.clear_tokens().unwrap();
        let once = store.session();
        store.clear_tokens().unwrap();
        assert_eq!(store.session(), once);
        assert!(once.is_empty());
    }

    #[test]
    fn test_records_carry_max_ages() {
        let storage = MemoryStorage::new();
        let store = TokenStore::new(Box::new(storage.clone()));
        store.set_tokens("a", "r").unwrap();

        let access = storage.get(ACCESS_TOKEN_KEY).unwrap().unwrap();
        let refresh = storage.get(REFRESH_TOKEN_KEY).unwrap().unwrap();
        assert_eq!(access.max_age_secs, 3600);
        assert_eq!(refresh.max_age_secs, 604_800);
    }

    #[test]
    fn test_loads_existing_session_on_construction() {
        let storage = MemoryStorage::new();
        TokenStore::new(Box::new(storage.clone()))
            .set_tokens("a", "r")
            .unwrap();

        let reloaded = TokenStore::new(Box::new(storage));
        assert_eq!(reloaded.access_token().as_deref(), Some("a"));
    }

    #[test]
    fn test_observes_writes_from_another_tab() {
        let shared = MemoryStorage::new();
        let tab_a = TokenStore::new(Box::new(shared.clone()));
        let tab_b = TokenStore::new(Box::new(shared));

        tab_a.set_tokens("a1", "r1").unwrap();
        assert_eq!(tab_b.access_token().as_deref(), Some("a1"));

        tab_b.clear_tokens().unwrap();
        assert!(tab_a.session().is_empty());
    }

    #[test]
    fn test_concurrent_writers_are_last_writer_wins() {
        // No cross-tab locking: the later write simply replaces the earlier one.
        let shared = MemoryStorage::new();
        let tab_a = TokenStore::new(Box::new(shared.clone()));
        let tab_b = TokenStore::new(Box::new(shared));

        tab_a.set_tokens("a-from-a", "r-from-a").unwrap();
        tab_b.set_tokens("a-from-b", "r-from-b").unwrap();

        assert_eq!(tab_a.access_token().as_deref(), Some("a-from-b"));
        assert_eq!(tab_a.refresh_token().as_deref(), Some("r-from-b"));
    }

    #[test]
    fn test_expired_access_record_reads_as_absent() {
        let storage = MemoryStorage::new();
        let store = TokenStore::new(Box::new(storage.clone()));
        store.set_tokens("a", "r").unwrap();

        let mut access = storage.get(ACCESS_TOKEN_KEY).unwrap().unwrap();
        access.stored_at = Utc::now() - Duration::seconds(ACCESS_TOKEN_MAX_AGE_SECS + 1);
        storage.set(ACCESS_TOKEN_KEY, access).unwrap();

        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token().as_deref(), Some("r"));
    }
}
