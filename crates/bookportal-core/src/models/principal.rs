//! Authenticated identity and the session that carries it.

use serde::{Deserialize, Serialize};

/// Role of an account. Decides which area of the portal it may enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The signed-in account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
}

impl Principal {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Bearer token proving the principal's identity to the API.
///
/// The token is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Short form suitable for display, e.g. `eyJhbGci...x8Qk`.
    pub fn preview(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() > 20 {
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        } else {
            "*".repeat(chars.len())
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// A principal together with its credential.
///
/// Both halves are always present; there is no partially signed-in state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub principal: Principal,
    pub credential: Credential,
}

impl Session {
    pub fn new(principal: Principal, credential: Credential) -> Self {
        Self {
            principal,
            credential,
        }
    }

    pub fn role(&self) -> Role {
        self.principal.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_and_display() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("guest".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_principal_wire_format() {
        let json = r#"{"id":7,"email":"a@b.io","firstName":"Ada","lastName":"Lovelace","role":"admin"}"#;
        let principal: Principal = serde_json::from_str(json).unwrap();
        assert_eq!(principal.full_name(), "Ada Lovelace");
        assert!(principal.is_admin());
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let json = r#"{"id":7,"email":"a@b.io","firstName":"Ada","lastName":"L"}"#;
        let principal: Principal = serde_json::from_str(json).unwrap();
        assert_eq!(principal.role, Role::User);
    }

    #[test]
    fn test_credential_is_redacted() {
        let cred = Credential::new("eyJhbGciOiJIUzI1NiJ9.payload.signature");
        assert_eq!(format!("{cred:?}"), "Credential(<redacted>)");
        assert_eq!(cred.preview(), "eyJhbGci...ture");
        assert_eq!(Credential::new("short").preview(), "*****");
    }
}
