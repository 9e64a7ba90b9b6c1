//! User-facing notifications raised by the API layer.
//!
//! Rendering is left to the front end; the library only describes what to
//! show through a `Notifier`. Every notice reports a failure.

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Default notifier: notices go to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        warn!(title = %notice.title, description = %notice.description, "Notice");
    }
}
