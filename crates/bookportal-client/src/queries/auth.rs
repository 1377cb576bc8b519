use bookportal_auth::SessionStore;
use bookportal_core::{
    AuthResponse, LoginRequest, Principal, RegisterRequest, Result, UpdateProfileRequest,
};
use tracing::{debug, info};

use super::keys::{auth_keys, user_keys};
use crate::query::{QueryClient, QueryResult};
use crate::resources::AuthClient;

/// Sign-in, sign-out and the signed-in principal's profile.
#[derive(Debug, Clone)]
pub struct AuthQueries {
    client: AuthClient,
    cache: QueryClient,
    session: SessionStore,
}

impl AuthQueries {
    pub fn new(client: AuthClient, cache: QueryClient, session: SessionStore) -> Self {
        Self {
            client,
            cache,
            session,
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let response = self.client.login(request).await?;
        self.start_session(&response)?;
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response = self.client.register(request).await?;
        self.start_session(&response)?;
        Ok(response)
    }

    /// Drop the session and everything cached for it.
    pub fn logout(&self) -> Result<()> {
        let cleared = self.session.clear();
        self.cache.clear();
        cleared?;
        Ok(())
    }

    pub async fn profile(&self) -> Result<QueryResult<Principal>> {
        let client = self.client.clone();
        self.cache
            .get_or_revalidate(&auth_keys::profile(), move || async move {
                client.profile().await
            })
            .await
    }

    /// Only name and e-mail change; role and credential stay as they are.
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<Principal> {
        let updated = self.client.update_profile(request).await?;
        let principal = self.session.update_principal(&updated)?;
        self.cache.invalidate(&auth_keys::profile());
        self.cache.invalidate(&user_keys::all());
        self.cache.set_query_data(&auth_keys::profile(), &principal)?;
        debug!(user_id = principal.id, "profile updated");
        Ok(principal)
    }

    fn start_session(&self, response: &AuthResponse) -> Result<()> {
        let session = response.clone().into_session();
        // data cached for a previous principal must not leak into this one
        self.cache.clear();
        self.session
            .set_session(session.principal.clone(), session.credential)?;
        self.cache
            .set_query_data(&auth_keys::profile(), &session.principal)?;
        info!(user_id = session.principal.id, "session started");
        Ok(())
    }
}
