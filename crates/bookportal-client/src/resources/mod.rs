//! Typed wrappers over the REST endpoints.
//!
//! Inputs are validated before anything is sent. Non-2xx responses become
//! [`ClientError::Http`](bookportal_core::ClientError) with the server's
//! message; response envelopes are normalized here.

pub mod auth;
pub mod books;
pub mod feedback;
pub mod users;

pub use auth::AuthClient;
pub use books::BooksClient;
pub use feedback::FeedbackClient;
pub use users::UsersClient;

use bookportal_core::{ClientError, Result};

fn require_selection(ids: &[i64]) -> Result<()> {
    if ids.is_empty() {
        return Err(ClientError::invalid_input("No items selected"));
    }
    Ok(())
}
