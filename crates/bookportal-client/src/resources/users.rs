use std::sync::Arc;

use bookportal_core::{
    CreateUser, MessageResponse, Paginated, Result, UpdateUser, User, UserFilters,
    UsersListResponse, with_query,
};
use serde_json::json;

use super::require_selection;
use crate::http::ApiClient;

/// Account administration. Every endpoint needs the admin role.
#[derive(Debug, Clone)]
pub struct UsersClient {
    api: Arc<ApiClient>,
}

impl UsersClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// The endpoint answers in several shapes; all of them are normalized to
    /// one paginated envelope.
    pub async fn list(&self, filters: &UserFilters) -> Result<Paginated<User>> {
        let response: UsersListResponse = self.api.get(&with_query("/auth/users", filters)).await?;
        Ok(response.normalize())
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.api.get(&format!("/auth/users/{id}")).await
    }

    pub async fn create(&self, input: &CreateUser) -> Result<User> {
        input.validate()?;
        self.api.post("/auth/users", input).await
    }

    pub async fn update(&self, id: i64, input: &UpdateUser) -> Result<User> {
        input.validate()?;
        self.api.patch(&format!("/auth/users/{id}"), input).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        self.api.delete(&format!("/auth/users/{id}")).await
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<MessageResponse> {
        require_selection(ids)?;
        self.api
            .delete_with_body("/auth/users/bulk", &json!({ "ids": ids }))
            .await
    }
}
