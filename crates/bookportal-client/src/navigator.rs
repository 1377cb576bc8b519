//! Navigation side effects triggered by the HTTP client.

use tracing::info;

/// Moves the front end to another view.
///
/// The HTTP client calls `redirect` once when the API rejects the current
/// credential; front ends decide what navigating means for them.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Navigator that only logs. Used when no front end is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, path: &str) {
        info!(path, "redirect requested");
    }
}
