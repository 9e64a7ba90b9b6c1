//! API client for communicating with the admin-console REST backend.
//!
//! This module provides the `ApiClient` struct: base URL, fixed timeout,
//! bearer attachment, and recovery from an expired access token through a
//! single refresh-and-retry cycle per request.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::{SessionController, TokenStore};
use crate::models::TokenPair;
use crate::notify::{Notice, Notifier, TracingNotifier};

use super::{ApiError, ApiRequest, Attempt, Envelope};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in milliseconds.
pub const REQUEST_TIMEOUT_MS: u64 = 10_000;

const REFRESH_TOKEN_PATH: &str = "/auth/refresh-token";
const LOGOUT_PATH: &str = "/auth/logout";

/// Notice title raised when an endpoint answers with a non-success envelope.
const LOAD_FAILED_TITLE: &str = "Failed to load data from server!";

#[derive(Debug, Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

/// Token endpoints have been seen answering both bare and enveloped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TokenResponse {
    Bare(TokenPair),
    Wrapped(Envelope<TokenPair>),
}

impl TokenResponse {
    pub(crate) fn into_pair(self) -> Result<TokenPair, ApiError> {
        match self {
            TokenResponse::Bare(pair) => Ok(pair),
            TokenResponse::Wrapped(envelope) => envelope.into_data(),
        }
    }
}

/// API client for the admin backend.
/// Clone is cheap - reqwest::Client and the session are shared through Arc.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionController,
    notifier: Arc<dyn Notifier>,
    refresh_lock: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a client for `base_url` bound to the given session.
    pub fn new(base_url: &str, session: SessionController) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Configuration(format!(
                "API base URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            session,
            notifier: Arc::new(TracingNotifier),
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Replace the notifier used for user-facing failures.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn tokens(&self) -> &TokenStore {
        self.session.tokens()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    /// Send one attempt of `request`, attaching `access_token` as a bearer
    /// credential when present.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        debug!(
            method = %request.method,
            path = %request.path,
            status = response.status().as_u16(),
            "Response received"
        );
        Self::check_response(response).await
    }

    /// Run `request` to completion.
    ///
    /// A 401 on the first attempt triggers one refresh; the retried attempt's
    /// outcome is returned as-is. Without a refresh token the original 401 is
    /// returned. When the refresh itself fails the session is invalidated and
    /// the refresh error is returned instead of the 401.
    pub async fn execute(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let mut attempt = Attempt::First;
        loop {
            let access_token = match &attempt {
                Attempt::First => self.tokens().access_token(),
                Attempt::Retry { access_token } => Some(access_token.clone()),
            };

            let error = match self.dispatch(&request, access_token.as_deref()).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            if attempt.is_retry() || !error.is_unauthorized() {
                return Err(error);
            }

            debug!(path = %request.path, "Access token rejected, attempting refresh");
            match self.recover_session(access_token.as_deref()).await? {
                Some(access_token) => attempt = Attempt::Retry { access_token },
                None => return Err(error),
            }
        }
    }

    /// Obtain a usable access token after `rejected` was refused.
    ///
    /// Refreshes are serialised. If another request already rotated the
    /// access token while this one waited, the rotated token is reused
    /// instead of refreshing again. Returns `Ok(None)` when there is no
    /// refresh token to spend.
    async fn recover_session(&self, rejected: Option<&str>) -> Result<Option<String>, ApiError> {
        let _guard = self.refresh_lock.lock().await;
        let tokens = self.tokens();

        if let Some(current) = tokens.access_token() {
            if rejected != Some(current.as_str()) {
                debug!("Access token already rotated, reusing it");
                return Ok(Some(current));
            }
        }

        let Some(refresh_token) = tokens.refresh_token() else {
            debug!("No refresh token available");
            return Ok(None);
        };

        match self.refresh_tokens(&refresh_token).await {
            Ok(pair) => {
                info!("Access token refreshed");
                Ok(Some(pair.access_token))
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, ending session");
                self.session.invalidate();
                Err(ApiError::RefreshFailed(Box::new(e)))
            }
        }
    }

    /// Exchange the refresh token for a new pair and persist it. The store is
    /// cleared before the new pair is written so no stale half survives.
    async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let request = ApiRequest::post(REFRESH_TOKEN_PATH).json(&TokenBody {
            token: refresh_token,
        })?;
        let current_access = self.tokens().access_token();
        let response = self.dispatch(&request, current_access.as_deref()).await?;

        let pair = Self::decode::<TokenResponse>(response, REFRESH_TOKEN_PATH)
            .await?
            .into_pair()?;

        let tokens = self.tokens();
        tokens
            .clear_tokens()
            .and_then(|()| tokens.set_tokens(&pair.access_token, &pair.refresh_token))
            .map_err(ApiError::Storage)?;
        Ok(pair)
    }

    /// Run `request` and decode the JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let path = request.path.clone();
        let response = self.execute(request).await?;
        Self::decode(response, &path).await
    }

    /// Run `request` and decode the backend envelope.
    ///
    /// A non-success envelope raises a notice but is still returned; the
    /// caller decides whether it is fatal. Errors raise a notice and are
    /// returned.
    pub async fn api_request<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Envelope<T>, ApiError> {
        match self.send_json::<Envelope<T>>(request).await {
            Ok(envelope) => {
                if !envelope.is_success() {
                    self.notifier.notify(Notice::error(
                        LOAD_FAILED_TITLE,
                        envelope.err_msg.clone().unwrap_or_default(),
                    ));
                }
                Ok(envelope)
            }
            Err(e) => {
                self.notifier.notify(Notice::error("", e.to_string()));
                Err(e)
            }
        }
    }

    /// Ask the backend to invalidate `refresh_token`.
    pub async fn revoke_refresh_token(&self, refresh_token: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post(LOGOUT_PATH).json(&TokenBody {
            token: refresh_token,
        })?;
        self.execute(request).await?;
        Ok(())
    }

    /// Log out through the session controller.
    pub async fn logout(&self) -> anyhow::Result<()> {
        self.session.logout(self).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LogNavigator;

    fn session() -> SessionController {
        SessionController::new(Arc::new(TokenStore::in_memory()), Arc::new(LogNavigator))
    }

    #[test]
    fn test_rejects_base_url_without_scheme() {
        let result = ApiClient::new("api.example.com", session());
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn test_url_joins_paths() {
        let client = ApiClient::new("https://api.example.com/v1/", session()).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/v1");
        assert_eq!(client.url("/tags"), "https://api.example.com/v1/tags");
        assert_eq!(client.url("tags/1"), "https://api.example.com/v1/tags/1");
    }

    #[test]
    fn test_parse_refresh_response_shapes() {
        let bare: TokenResponse =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert!(matches!(bare, TokenResponse::Bare(ref p) if p.access_token == "a"));

        let wrapped: TokenResponse = serde_json::from_str(
            r#"{"data":{"accessToken":"a2","refreshToken":"r2"},"message":"ok","responseStatus":"success"}"#,
        )
        .unwrap();
        assert!(matches!(wrapped, TokenResponse::Wrapped(_)));
        assert_eq!(wrapped.into_pair().unwrap().refresh_token, "r2");

        let failed: TokenResponse = serde_json::from_str(
            r#"{"data":null,"message":"Invalid token","responseStatus":"error"}"#,
        )
        .unwrap();
        assert!(matches!(failed.into_pair(), Err(ApiError::Application { .. })));
    }
}
