use serde::{Deserialize, Serialize};

use super::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

/// Uniform wrapper every backend endpoint responds with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub err_msg: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub response_status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.response_status == ResponseStatus::Success
    }

    /// Error built from a non-success envelope.
    pub fn application_error(&self) -> ApiError {
        ApiError::Application {
            message: self
                .message
                .clone()
                .unwrap_or_else(|| "Request failed".to_string()),
            err_msg: self.err_msg.clone(),
        }
    }

    /// Ensure the envelope reports success, discarding the payload.
    pub fn into_success(self) -> Result<(), ApiError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self.application_error())
        }
    }

    /// Payload of a successful envelope. A success envelope without data is
    /// an invalid response.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(self.application_error());
        }
        self.data
            .ok_or_else(|| ApiError::InvalidResponse("Envelope has no data".to_string()))
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
}
