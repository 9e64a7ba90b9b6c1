use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::api::{ApiClient, ApiError, ApiRequest, Envelope, ResponseStatus};
use crate::models::Advisor;

const ADVISORS_PATH: &str = "/advisors";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AdvisorsBody {
    List(Vec<Advisor>),
    Wrapped(Envelope<Vec<Advisor>>),
}

/// Fetch the advisor directory. Never fails: the outcome is reported as a
/// locally built envelope carrying the HTTP status.
pub async fn fetch_advisors(client: &ApiClient) -> Envelope<Vec<Advisor>> {
    let timestamp = Some(Utc::now().to_rfc3339());

    let result = load(client).await;
    match result {
        Ok((status, advisors)) => Envelope {
            data: Some(advisors),
            message: Some("Advisors retrieved successfully".to_string()),
            err_msg: None,
            timestamp,
            response_status: ResponseStatus::Success,
            status: Some(status),
        },
        Err(ApiError::InvalidResponse(detail)) => {
            warn!(detail = %detail, "Unreadable advisors response");
            Envelope {
                data: Some(Vec::new()),
                message: Some("An unknown error occurred".to_string()),
                err_msg: Some("Unknown error".to_string()),
                timestamp,
                response_status: ResponseStatus::Error,
                status: Some(500),
            }
        }
        Err(e) => {
            warn!(error = %e, "Failed to retrieve advisors");
            Envelope {
                data: Some(Vec::new()),
                message: Some("Failed to retrieve advisors".to_string()),
                err_msg: Some(e.to_string()),
                timestamp,
                response_status: ResponseStatus::Error,
                status: Some(e.status().unwrap_or(500)),
            }
        }
    }
}

async fn load(client: &ApiClient) -> Result<(u16, Vec<Advisor>), ApiError> {
    let response = client.execute(ApiRequest::get(ADVISORS_PATH)).await?;
    let status = response.status().as_u16();
    let text = response.text().await?;
    let body: AdvisorsBody = serde_json::from_str(&text)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse advisors: {}", e)))?;
    let advisors = match body {
        AdvisorsBody::List(advisors) => advisors,
        AdvisorsBody::Wrapped(envelope) => envelope.into_data()?,
    };
    Ok((status, advisors))
}
