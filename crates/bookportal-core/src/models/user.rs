use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ClientError, Result};
use crate::models::principal::{Principal, Role};
use crate::validation::{require_non_blank, validate_email, validate_password};

/// Account record as seen by administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl CreateUser {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        require_non_blank("First name", &self.first_name)?;
        require_non_blank("Last name", &self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<()> {
        if self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.role.is_none()
        {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_without_timestamps() {
        let json = r#"{"id":3,"email":"x@y.io","firstName":"X","lastName":"Y","role":"user"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.created_at.is_none());
        let principal: Principal = user.into();
        assert_eq!(principal.id, 3);
    }

    #[test]
    fn test_create_user_validation() {
        let input = CreateUser {
            email: "new@example.com".into(),
            password: "hunter22".into(),
            first_name: "New".into(),
            last_name: "Reader".into(),
            role: Some(Role::Admin),
        };
        assert!(input.validate().is_ok());
        assert!(
            CreateUser {
                password: "123".into(),
                ..input
            }
            .validate()
            .is_err()
        );
    }
}
