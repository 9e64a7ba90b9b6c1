use tracing::error;

use crate::api::{ApiClient, ApiRequest};
use crate::models::{NewRole, Role};

use super::{fetch_data, StoreError};

const ROLES_PATH: &str = "/roles";

const FETCH_FAILED: &str = "Failed to load roles";
const CREATE_FAILED: &str = "Failed to create role";

/// Role list. Unlike the other listings, a failed fetch is returned to the
/// caller.
#[derive(Debug)]
pub struct RoleStore {
    client: ApiClient,
    roles: Vec<Role>,
    loading: bool,
}

impl RoleStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            roles: Vec::new(),
            loading: false,
        }
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn fetch_roles(&mut self) -> Result<&[Role], StoreError> {
        self.loading = true;
        let result = fetch_data::<Vec<Role>>(&self.client, ApiRequest::get(ROLES_PATH)).await;
        self.loading = false;

        match result {
            Ok(roles) => {
                self.roles = roles;
                Ok(&self.roles)
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch roles");
                Err(StoreError::new(FETCH_FAILED, e))
            }
        }
    }

    pub async fn create_role(&mut self, role: &NewRole) -> Result<Role, StoreError> {
        let request = ApiRequest::post(ROLES_PATH)
            .json(role)
            .map_err(|e| StoreError::new(CREATE_FAILED, e))?;
        let result = fetch_data::<Role>(&self.client, request).await;
        match result {
            Ok(created) => {
                self.roles.push(created.clone());
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, "Failed to create role");
                Err(StoreError::new(CREATE_FAILED, e))
            }
        }
    }
}
