//! Paginated list envelope and normalization of the users list shapes.

use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Standard list envelope: `{data, total, page, limit, totalPages}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }

    /// Wrap a complete, unpaginated collection as its own single page.
    pub fn single_page(data: Vec<T>) -> Self {
        let len = data.len() as u64;
        Self {
            total: len,
            page: 1,
            limit: u32::try_from(data.len()).unwrap_or(u32::MAX),
            total_pages: u32::from(!data.is_empty()),
            data,
        }
    }
}

/// Number of pages needed for `total` items at `limit` per page.
pub fn page_count(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
}

/// The shapes the users endpoint is known to answer with.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UsersListResponse {
    /// `{data, total, page, limit, totalPages}`
    Paginated(Paginated<User>),
    /// `{users, total?, page?, limit?, totalPages?}`
    Wrapped(WrappedUsers),
    /// `[...]`
    Bare(Vec<User>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedUsers {
    pub users: Vec<User>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl UsersListResponse {
    /// Normalize into the standard envelope.
    ///
    /// A bare array is the whole collection in one response, so it becomes a
    /// single page sized to its contents. Missing counters of the wrapped
    /// shape are derived from what was returned.
    pub fn normalize(self) -> Paginated<User> {
        match self {
            Self::Paginated(page) => page,
            Self::Bare(users) => Paginated::single_page(users),
            Self::Wrapped(wrapped) => {
                let returned = u32::try_from(wrapped.users.len()).unwrap_or(u32::MAX);
                let total = wrapped.total.unwrap_or(u64::from(returned));
                let page = wrapped.page.unwrap_or(1);
                let limit = wrapped.limit.unwrap_or(returned);
                let total_pages = wrapped
                    .total_pages
                    .unwrap_or_else(|| page_count(total, limit));
                Paginated {
                    data: wrapped.users,
                    total,
                    page,
                    limit,
                    total_pages,
                }
            }
        }
    }
}
