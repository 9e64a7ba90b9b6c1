use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::api::ApiClient;

use super::TokenStore;

/// Route the user lands on when the session cannot be recovered.
pub const LOGIN_ROUTE: &str = "/login";

/// Something that can move the user to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that only records the redirect in the log.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!(path, "Navigation requested");
    }
}

/// Owns logout and forced invalidation. This is the only place that sends
/// the user back to the login route.
#[derive(Clone)]
pub struct SessionController {
    tokens: Arc<TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionController {
    pub fn new(tokens: Arc<TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { tokens, navigator }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn is_authenticated(&self) -> bool {
        !self.tokens.session().is_empty()
    }

    /// Revoke the refresh token server-side (best effort), then clear the
    /// local session no matter how the server call went.
    pub async fn logout(&self, client: &ApiClient) -> Result<()> {
        if let Some(refresh_token) = self.tokens.refresh_token() {
            if let Err(e) = client.revoke_refresh_token(&refresh_token).await {
                warn!(error = %e, "Server-side logout failed, clearing local session anyway");
            }
        }
        self.tokens.clear_tokens()?;
        info!("Logged out");
        Ok(())
    }

    /// Drop the session after an unrecoverable auth failure and send the
    /// user to the login route.
    pub fn invalidate(&self) {
        if let Err(e) = self.tokens.clear_tokens() {
            warn!(error = %e, "Failed to remove persisted tokens");
        }
        self.navigator.navigate(LOGIN_ROUTE);
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
