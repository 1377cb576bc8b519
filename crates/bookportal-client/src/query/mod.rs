//! Query cache and its key model.

pub mod cache;
pub mod key;

pub use cache::{CacheStats, EntryState, EntryStatus, QueryClient, QueryResult, QueryStatus};
pub use key::{Family, KeySegment, QueryKey, Tag};
