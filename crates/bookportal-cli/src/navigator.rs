use bookportal_client::Navigator;

use crate::output::print_warning;

/// Tells the user to sign in again when the API rejects the stored session.
#[derive(Debug, Clone)]
pub struct TerminalNavigator {
    profile: String,
}

impl TerminalNavigator {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn hint(&self) -> String {
        if self.profile == "default" {
            "bookportal login".to_string()
        } else {
            format!("bookportal --profile {} login", self.profile)
        }
    }
}

impl Navigator for TerminalNavigator {
    fn redirect(&self, path: &str) {
        tracing::debug!(path, "session rejected by the server");
        print_warning(&format!(
            "Session expired or revoked. Run `{}` to sign in again.",
            self.hint()
        ));
    }
}
