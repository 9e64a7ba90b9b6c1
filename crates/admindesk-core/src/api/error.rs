use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Token refresh failed: {0}")]
    RefreshFailed(#[source] Box<ApiError>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Body could not be encoded or decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{message}")]
    Application {
        message: String,
        err_msg: Option<String>,
    },

    #[error("Token storage error: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                body: truncated,
            },
            code => ApiError::HttpStatus {
                status: code,
                body: truncated,
            },
        }
    }

    /// The `message` field of a JSON error body, when the backend sent one.
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            ApiError::AccessDenied(body)
            | ApiError::NotFound(body)
            | ApiError::ServerError { body, .. }
            | ApiError::HttpStatus { body, .. }
            | ApiError::InvalidResponse(body) => body,
            ApiError::Application { message, .. } => return Some(message.clone()),
            ApiError::RefreshFailed(inner) => return inner.server_message(),
            _ => return None,
        };
        let json = &body[body.find('{')?..];
        let value: serde_json::Value = serde_json::from_str(json).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status this error stands for, when it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::ServerError { status, .. } | ApiError::HttpStatus { status, .. } => {
                Some(*status)
            }
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            ApiError::RefreshFailed(inner) => inner.status(),
            _ => None,
        }
    }
}
