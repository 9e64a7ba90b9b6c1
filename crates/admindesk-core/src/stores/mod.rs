//! State containers over the API client.
//!
//! Each store keeps the last fetched data plus `loading` / `error` state for
//! a front end to render. Reads never fail: errors are logged and recorded
//! as a message in `error`, and an empty result is returned. Writes return
//! a `StoreError` holding a user-facing message and the underlying cause.

pub mod advisors;
pub mod articles;
pub mod auth;
pub mod roles;
pub mod tags;
pub mod team;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::{ApiClient, ApiError, ApiRequest};

pub use advisors::fetch_advisors;
pub use articles::{dedupe_by_id, ArticleStore};
pub use auth::AuthStore;
pub use roles::RoleStore;
pub use tags::TagStore;
pub use team::TeamStore;

/// A failed write: what to tell the user, and why it happened.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    #[source]
    pub cause: ApiError,
}

impl StoreError {
    pub fn new(message: impl Into<String>, cause: ApiError) -> Self {
        Self {
            message: message.into(),
            cause,
        }
    }
}

/// Run `request` through the envelope helper and take its payload.
pub(crate) async fn fetch_data<T: DeserializeOwned>(
    client: &ApiClient,
    request: ApiRequest,
) -> Result<T, ApiError> {
    client.api_request::<T>(request).await?.into_data()
}

/// Run `request` and only check the envelope reports success.
pub(crate) async fn send_ok(client: &ApiClient, request: ApiRequest) -> Result<(), ApiError> {
    client
        .api_request::<serde_json::Value>(request)
        .await?
        .into_success()
}
