//! Client SDK for the Bookportal REST API.
//!
//! Layers, bottom up:
//! - [`http::ApiClient`]: credential injection and the single 401 policy
//! - [`resources`]: typed endpoint wrappers with input validation
//! - [`query::QueryClient`]: key-addressed cache with single-flight fetches
//! - [`queries`]: cached reads and mutations with their invalidation rules
//! - [`Portal`]: all of the above wired to one session store

pub mod http;
pub mod navigator;
pub mod portal;
pub mod queries;
pub mod query;
pub mod resources;

pub use http::{ApiClient, ApiResponse};
pub use navigator::{LogNavigator, Navigator};
pub use portal::{Portal, PortalBuilder};
pub use query::{EntryState, EntryStatus, QueryClient, QueryKey, QueryResult, QueryStatus};
