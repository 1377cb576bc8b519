//! Domain types shared by the Bookportal client crates.
//!
//! Everything here is plain data exchanged with the Bookportal REST API plus
//! the error taxonomy every client call returns.

pub mod error;
pub mod filters;
pub mod models;
pub mod pagination;
pub mod validation;

pub use error::{ClientError, ErrorKind, Result};
pub use filters::{BookFilters, FeedbackFilters, ListFilter, PageRequest, UserFilters, with_query};
pub use models::*;
pub use pagination::{Paginated, UsersListResponse, page_count};
