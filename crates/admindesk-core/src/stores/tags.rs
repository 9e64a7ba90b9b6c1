use tracing::{error, warn};

use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{flatten_tags, RawTag, Tag, TagPayload};

use super::{fetch_data, send_ok, StoreError};

const TAGS_PATH: &str = "/tags";

const FETCH_FAILED: &str = "Failed to load tags";
const CREATE_FAILED: &str = "Failed to create tag";
const UPDATE_FAILED: &str = "Failed to update tag";
const DELETE_FAILED: &str = "Failed to delete tag";

/// Tag list, kept both as stored (`raw_tags`) and flattened for display.
#[derive(Debug)]
pub struct TagStore {
    client: ApiClient,
    raw_tags: Vec<RawTag>,
    tags: Vec<Tag>,
    loading: bool,
    error: Option<String>,
}

impl TagStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            raw_tags: Vec::new(),
            tags: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn raw_tags(&self) -> &[RawTag] {
        &self.raw_tags
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn replace_raw(&mut self, raw: Vec<RawTag>) {
        self.tags = flatten_tags(&raw);
        self.raw_tags = raw;
    }

    fn fail(&mut self, message: &str, cause: ApiError) -> StoreError {
        error!(error = %cause, "{}", message);
        self.error = Some(message.to_string());
        StoreError::new(message, cause)
    }

    pub async fn fetch_tags(&mut self) -> &[Tag] {
        self.loading = true;
        self.error = None;

        let result = fetch_data::<Vec<RawTag>>(&self.client, ApiRequest::get(TAGS_PATH)).await;
        match result {
            Ok(raw) => self.replace_raw(raw),
            Err(e) => {
                warn!(error = %e, "Failed to fetch tags");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }

        self.loading = false;
        &self.tags
    }

    pub async fn create_tag(&mut self, payload: &TagPayload) -> Result<RawTag, StoreError> {
        let request = ApiRequest::post(TAGS_PATH)
            .json(payload)
            .map_err(|e| self.fail(CREATE_FAILED, e))?;
        let result = fetch_data::<RawTag>(&self.client, request).await;
        let created = result.map_err(|e| self.fail(CREATE_FAILED, e))?;

        let mut raw = std::mem::take(&mut self.raw_tags);
        raw.push(created.clone());
        self.replace_raw(raw);
        Ok(created)
    }

    pub async fn update_tag(&mut self, id: &str, payload: &TagPayload) -> Result<RawTag, StoreError> {
        let request = ApiRequest::put(format!("{}/{}", TAGS_PATH, id))
            .json(payload)
            .map_err(|e| self.fail(UPDATE_FAILED, e))?;
        let result = fetch_data::<RawTag>(&self.client, request).await;
        let updated = result.map_err(|e| self.fail(UPDATE_FAILED, e))?;

        if let Some(index) = self.raw_tags.iter().position(|t| t.id == id) {
            let mut raw = std::mem::take(&mut self.raw_tags);
            raw[index] = updated.clone();
            self.replace_raw(raw);
        }
        Ok(updated)
    }

    pub async fn delete_tag(&mut self, id: &str) -> Result<(), StoreError> {
        let result = send_ok(&self.client, ApiRequest::delete(format!("{}/{}", TAGS_PATH, id))).await;
        result.map_err(|e| self.fail(DELETE_FAILED, e))?;

        let mut raw = std::mem::take(&mut self.raw_tags);
        raw.retain(|t| t.id != id);
        self.replace_raw(raw);
        Ok(())
    }
}
