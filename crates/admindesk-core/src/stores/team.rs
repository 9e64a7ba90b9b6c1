use tracing::warn;

use crate::api::{ApiClient, ApiRequest};
use crate::models::TeamMember;

use super::fetch_data;

const USERS_PATH: &str = "/users";
const FETCH_FAILED: &str = "Failed to load team members";

#[derive(Debug)]
pub struct TeamStore {
    client: ApiClient,
    members: Vec<TeamMember>,
    loading: bool,
    error: Option<String>,
}

impl TeamStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            members: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn fetch_team_members(&mut self) -> &[TeamMember] {
        self.loading = true;
        self.error = None;

        let result = fetch_data::<Vec<TeamMember>>(&self.client, ApiRequest::get(USERS_PATH)).await;
        match result {
            Ok(members) => self.members = members,
            Err(e) => {
                warn!(error = %e, "Failed to fetch team members");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }

        self.loading = false;
        &self.members
    }
}
