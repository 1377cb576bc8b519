use std::sync::Arc;

use bookportal_core::{
    AuthResponse, LoginRequest, Principal, ProfileResponse, RegisterRequest, Result,
    UpdateProfileRequest,
};

use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct AuthClient {
    api: Arc<ApiClient>,
}

impl AuthClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        request.validate()?;
        self.api.post("/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        request.validate()?;
        self.api.post("/auth/register", request).await
    }

    pub async fn profile(&self) -> Result<Principal> {
        let response: ProfileResponse = self.api.get("/auth/profile").await?;
        Ok(response.user)
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<Principal> {
        request.validate()?;
        let response: ProfileResponse = self.api.put("/auth/profile", request).await?;
        Ok(response.user)
    }
}
