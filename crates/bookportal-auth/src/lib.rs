//! Session handling for the Bookportal client.
//!
//! - [`SessionStore`]: the single source of truth for the signed-in principal
//!   and its bearer credential, with change notifications
//! - [`SessionStorage`]: where the session is persisted between runs
//! - [`RouteGuard`]: redirects navigations the current session may not make

pub mod error;
pub mod guard;
pub mod session;
pub mod storage;

pub use error::{SessionError, SessionResult};
pub use guard::{GuardDecision, RouteGuard};
pub use session::{SessionEvent, SessionSnapshot, SessionStore};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
