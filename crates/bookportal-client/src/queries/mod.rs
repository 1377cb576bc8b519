//! Cached reads and mutations with their invalidation rules.
//!
//! Reads go through the query cache (stale-while-revalidate). A mutation
//! calls the API first; only on success does it overwrite detail entries and
//! invalidate dependent key families, and both happen before the mutation
//! returns.

pub mod auth;
pub mod books;
pub mod feedback;
pub mod keys;
pub mod stats;
pub mod users;

pub use auth::AuthQueries;
pub use books::BookQueries;
pub use feedback::FeedbackQueries;
pub use keys::{auth_keys, book_keys, feedback_keys, stats_keys, user_keys};
pub use stats::StatsQueries;
pub use users::UserQueries;

use crate::query::{QueryClient, QueryKey};

fn invalidate_all(cache: &QueryClient, prefixes: &[QueryKey]) {
    for prefix in prefixes {
        cache.invalidate(prefix);
    }
}
