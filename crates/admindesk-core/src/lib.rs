//! Core library for admindesk.
//!
//! Talks to the admin-console REST backend on behalf of a front end:
//! token storage and refresh, the session, route guarding, and stores for
//! articles, tags, users and roles.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod notify;
pub mod routes;
pub mod stores;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiRequest, Envelope, Paginated};
pub use auth::{Navigator, SessionController, TokenStore};
pub use config::Config;
pub use notify::{Notice, Notifier};
pub use routes::Router;
pub use stores::StoreError;
