//! Authentication module for managing the token pair and the session.
//!
//! This module provides:
//! - `TokenStore`: Access/refresh tokens mirrored over durable storage
//! - `TokenStorage` backends: JSON jar file, OS keychain, in-memory
//! - `SessionController`: Logout and forced invalidation with redirect
//!
//! Access tokens expire after one hour, refresh tokens after one week.

pub mod credentials;
pub mod session;
pub mod storage;
pub mod tokens;

pub use credentials::KeyringStorage;
pub use session::{LogNavigator, Navigator, SessionController, LOGIN_ROUTE};
pub use storage::{FileStorage, MemoryStorage, PersistedToken, SameSite, TokenStorage};
pub use tokens::{
    Session, TokenStore, ACCESS_TOKEN_KEY, ACCESS_TOKEN_MAX_AGE_SECS, REFRESH_TOKEN_KEY,
    REFRESH_TOKEN_MAX_AGE_SECS,
};
