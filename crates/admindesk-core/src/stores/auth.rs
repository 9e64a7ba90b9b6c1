use tracing::{error, info};

use crate::api::client::TokenResponse;
use crate::api::{ApiClient, ApiError, ApiRequest, Envelope};
use crate::models::{LoginPayload, RegisterPayload};

use super::StoreError;

const REGISTER_PATH: &str = "/auth/register";
const LOGIN_PATH: &str = "/auth/login";

const REGISTER_FAILED: &str = "User registration failed";
const LOGIN_FAILED: &str = "Login failed";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Account operations that do not need any cached state.
#[derive(Debug, Clone)]
pub struct AuthStore {
    client: ApiClient,
}

impl AuthStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Register a user. The error message is the backend's own message when
    /// it sent one.
    pub async fn register(
        &self,
        payload: &RegisterPayload,
    ) -> Result<Envelope<serde_json::Value>, StoreError> {
        let result = self.send_register(payload).await;
        result.map_err(|e| {
            error!(error = %e, email = %payload.email, "Registration failed");
            let message = e
                .server_message()
                .unwrap_or_else(|| REGISTER_FAILED.to_string());
            StoreError::new(message, e)
        })
    }

    async fn send_register(
        &self,
        payload: &RegisterPayload,
    ) -> Result<Envelope<serde_json::Value>, ApiError> {
        let request = ApiRequest::post(REGISTER_PATH).json(payload)?;
        let envelope = self.client.send_json::<Envelope<serde_json::Value>>(request).await?;
        if !envelope.is_success() {
            return Err(envelope.application_error());
        }
        Ok(envelope)
    }

    /// Exchange credentials for a token pair and store it.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), StoreError> {
        let payload = LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.send_login(&payload).await;
        match result {
            Ok(()) => {
                info!(email, "Logged in");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, email, "Login failed");
                let message = if e.is_unauthorized() {
                    INVALID_CREDENTIALS.to_string()
                } else {
                    e.server_message().unwrap_or_else(|| LOGIN_FAILED.to_string())
                };
                Err(StoreError::new(message, e))
            }
        }
    }

    async fn send_login(&self, payload: &LoginPayload) -> Result<(), ApiError> {
        let request = ApiRequest::post(LOGIN_PATH).json(payload)?;
        let pair = self
            .client
            .send_json::<TokenResponse>(request)
            .await?
            .into_pair()?;
        self.client
            .tokens()
            .set_tokens(&pair.access_token, &pair.refresh_token)
            .map_err(ApiError::Storage)
    }
}
