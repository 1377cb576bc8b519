pub mod auth;
pub mod books;
pub mod feedback;
pub mod portal;
pub mod users;

use anyhow::{Result, bail};
use bookportal_auth::GuardDecision;
use bookportal_client::Portal;
use bookportal_core::PageRequest;

use crate::cli::{OutputFormat, PageArgs};

/// What every command needs: the wired portal and how to print.
pub struct App {
    pub portal: Portal,
    pub format: OutputFormat,
    pub profile: String,
}

impl App {
    /// Refuse to run a command the route guard would not let this session see.
    pub fn ensure_allowed(&self, path: &str) -> Result<()> {
        match self.portal.navigate(path) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::Redirect(target) if target == self.portal.guard().login_path() => {
                bail!("Not signed in. Run `bookportal login` first.")
            }
            GuardDecision::Redirect(_) => bail!("{path} requires an administrator account"),
        }
    }

    pub fn admin_path(&self, section: &str) -> String {
        format!(
            "{}/{section}",
            self.portal.config().routes.admin_prefix.trim_end_matches('/')
        )
    }
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest::new(args.page, args.limit)
    }
}
