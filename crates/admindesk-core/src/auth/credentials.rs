use anyhow::{Context, Result};
use keyring::Entry;

use super::storage::{PersistedToken, TokenStorage};

const SERVICE_NAME: &str = "admindesk";

/// Token records kept in the OS keychain, one entry per token name.
/// Each entry's secret is the JSON-encoded record.
#[derive(Debug, Clone, Default)]
pub struct KeyringStorage;

impl KeyringStorage {
    pub fn new() -> Self {
        Self
    }

    fn entry(name: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, name).context("Failed to create keyring entry")
    }
}

impl TokenStorage for KeyringStorage {
    fn get(&self, name: &str) -> Result<Option<PersistedToken>> {
        match Self::entry(name)?.get_password() {
            Ok(secret) => {
                let record = serde_json::from_str(&secret)
                    .context("Failed to parse token record from keychain")?;
                Ok(Some(record))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn set(&self, name: &str, record: PersistedToken) -> Result<()> {
        let secret = serde_json::to_string(&record)?;
        Self::entry(name)?
            .set_password(&secret)
            .context("Failed to store token in keychain")?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        match Self::entry(name)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}
