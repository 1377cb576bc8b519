//! The request pipeline every resource client goes through.
//!
//! Each request reads the credential from the session store at send time. A
//! `401` response expires the session that was used for the request and asks
//! the navigator to show the sign-in view; everything else is handed back
//! untouched.

use std::sync::Arc;

use bookportal_auth::{SessionSnapshot, SessionStore};
use bookportal_config::ApiConfig;
use bookportal_core::{ClientError, MessageResponse, Result};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::navigator::{LogNavigator, Navigator};

const UNAUTHORIZED: u16 = 401;

/// Raw response: status and body, nothing interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`ClientError::Http`] carrying the body's
    /// message.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_response(self.status, &self.body))
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| ClientError::decode(e.to_string()))
    }

    /// Decode an acknowledgement, accepting an empty body.
    pub fn message(&self) -> Result<MessageResponse> {
        if self.body.trim().is_empty() {
            return Ok(MessageResponse::default());
        }
        self.json()
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("login_path", &self.login_path)
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            navigator: Arc::new(LogNavigator),
            login_path: "/login".to_string(),
        })
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Send a request and return the response whatever its status.
    ///
    /// Only transport failures are errors here.
    pub async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        let snapshot = self.session.current();
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(credential) = snapshot.credential() {
            request = request.bearer_auth(credential.token());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, path, "sending request");
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;
        debug!(%method, path, status, "response received");

        if status == UNAUTHORIZED {
            self.on_unauthorized(&snapshot);
        }
        Ok(ApiResponse { status, body })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::GET, path, None)
            .await?
            .error_for_status()?
            .json()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await?.json()
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await?.json()
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await?.json()
    }

    pub async fn delete(&self, path: &str) -> Result<MessageResponse> {
        self.send(Method::DELETE, path, None)
            .await?
            .error_for_status()?
            .message()
    }

    /// `DELETE` with a JSON body, as used by the bulk endpoints.
    pub async fn delete_with_body<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<MessageResponse> {
        self.send_json(Method::DELETE, path, body).await?.message()
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::invalid_input(format!("cannot encode request body: {e}")))?;
        self.send(method, path, Some(&body))
            .await?
            .error_for_status()
    }

    fn on_unauthorized(&self, sent_with: &SessionSnapshot) {
        if !sent_with.is_authenticated() {
            debug!("401 on anonymous request");
            return;
        }
        // only the first 401 for this credential clears and redirects
        if self.session.expire(sent_with.generation()) {
            info!(to = %self.login_path, "credential rejected, redirecting to sign-in");
            self.navigator.redirect(&self.login_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_for_status_keeps_server_message() {
        let response = ApiResponse::new(409, r#"{"message":"ISBN already exists"}"#);
        let err = response.error_for_status().unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "ISBN already exists");
    }

    #[test]
    fn test_empty_acknowledgement() {
        let response = ApiResponse::new(204, "");
        assert_eq!(response.message().unwrap(), MessageResponse::default());
        let response = ApiResponse::new(200, r#"{"message":"Deleted"}"#);
        assert_eq!(
            response.message().unwrap().message.as_deref(),
            Some("Deleted")
        );
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:3001/".into(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config, SessionStore::in_memory()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
    }
}
