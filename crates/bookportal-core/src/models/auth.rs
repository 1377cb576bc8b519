//! Request and response bodies of the `/auth` endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::models::principal::{Credential, Principal, Role, Session};
use crate::validation::{require_non_blank, validate_email, validate_password};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        require_non_blank("Password", &self.password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        require_non_blank("First name", &self.first_name)?;
        require_non_blank("Last name", &self.last_name)
    }
}

/// Profile edit. Role and credential cannot be changed this way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<()> {
        if self.email.is_none() && self.first_name.is_none() && self.last_name.is_none() {
            return Err(ClientError::invalid_input("Nothing to update"));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(first) = &self.first_name {
            require_non_blank("First name", first)?;
        }
        if let Some(last) = &self.last_name {
            require_non_blank("Last name", last)?;
        }
        Ok(())
    }
}

/// Response of sign-in and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: Principal,
    pub access_token: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        Session::new(self.user, Credential::new(self.access_token))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: Principal,
}

/// Acknowledgement returned by deletes. Some endpoints answer with an empty
/// body, which decodes to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
