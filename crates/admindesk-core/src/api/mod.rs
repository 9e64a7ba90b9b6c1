//! REST API client module for the admin-console backend.
//!
//! This module provides the `ApiClient` for communicating with the backend
//! that serves articles, tags, users and roles, along with the response
//! envelope every endpoint wraps its payload in.
//!
//! The API uses bearer access tokens renewed through the
//! `/auth/refresh-token` endpoint.

pub mod client;
pub mod envelope;
pub mod error;
pub mod request;

pub use client::{ApiClient, REQUEST_TIMEOUT_MS};
pub use envelope::{Envelope, Paginated, ResponseStatus};
pub use error::ApiError;
pub use request::{ApiRequest, Attempt};
