//! List filters and their query-string encoding.
//!
//! Each filter emits its parameters in declaration order and skips absent or
//! blank values, so `{page: 1, limit: 10, search: "test"}` encodes as
//! `page=1&limit=10&search=test`.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::models::principal::Role;

/// Ordered `(name, value)` parameters of a list request.
pub type QueryPairs = Vec<(&'static str, String)>;

/// A filter object that can be sent as a query string and used as a cache key
/// discriminator.
pub trait ListFilter {
    fn query_pairs(&self) -> QueryPairs;

    /// Percent-encoded query string without the leading `?`.
    fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.query_pairs() {
            serializer.append_pair(name, &value);
        }
        serializer.finish()
    }

    /// Structural identity of the filter, independent of field order.
    fn canonical(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .query_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        pairs.sort();
        pairs
    }
}

/// Append `filter` to `path`, adding `?` only when there is something to add.
pub fn with_query(path: &str, filter: &impl ListFilter) -> String {
    let query = filter.to_query_string();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

fn push_text(pairs: &mut QueryPairs, name: &'static str, value: &Option<String>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            pairs.push((name, trimmed.to_string()));
        }
    }
}

fn push_num<T: ToString>(pairs: &mut QueryPairs, name: &'static str, value: Option<T>) {
    if let Some(v) = value {
        pairs.push((name, v.to_string()));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFilters {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub created_by: Option<i64>,
    pub exclude_created_by: Option<i64>,
}

impl BookFilters {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Default::default()
        }
    }
}

impl ListFilter for BookFilters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_text(&mut pairs, "title", &self.title);
        push_text(&mut pairs, "author", &self.author);
        push_text(&mut pairs, "isbn", &self.isbn);
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        push_num(&mut pairs, "createdBy", self.created_by);
        push_num(&mut pairs, "excludeCreatedBy", self.exclude_created_by);
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub rating: Option<u8>,
    pub book_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl FeedbackFilters {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Default::default()
        }
    }
}

impl ListFilter for FeedbackFilters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        push_text(&mut pairs, "search", &self.search);
        push_num(&mut pairs, "rating", self.rating);
        push_num(&mut pairs, "bookId", self.book_id);
        push_num(&mut pairs, "userId", self.user_id);
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<Role>,
}

impl ListFilter for UserFilters {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        push_text(&mut pairs, "search", &self.search);
        if let Some(role) = self.role {
            pairs.push(("role", role.as_str().to_string()));
        }
        pairs
    }
}

/// Plain page/limit pair for endpoints without other filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

impl ListFilter for PageRequest {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_page_only() {
        let filters = FeedbackFilters::page(1, 10);
        assert_eq!(
            with_query("/feedback/all-reviews", &filters),
            "/feedback/all-reviews?page=1&limit=10"
        );
    }

    #[test]
    fn test_feedback_search_is_appended_after_paging() {
        let filters = FeedbackFilters {
            search: Some("test".into()),
            ..FeedbackFilters::page(1, 10)
        };
        assert_eq!(filters.to_query_string(), "page=1&limit=10&search=test");
    }

    #[test]
    fn test_blank_and_absent_values_are_skipped() {
        let filters = BookFilters {
            title: Some("   ".into()),
            author: Some("Le Guin".into()),
            ..Default::default()
        };
        assert_eq!(filters.to_query_string(), "author=Le+Guin");
        assert_eq!(with_query("/books", &BookFilters::default()), "/books");
    }

    #[test]
    fn test_book_filter_order() {
        let filters = BookFilters {
            title: Some("Dune".into()),
            page: Some(2),
            limit: Some(5),
            exclude_created_by: Some(9),
            ..Default::default()
        };
        assert_eq!(
            filters.to_query_string(),
            "title=Dune&page=2&limit=5&excludeCreatedBy=9"
        );
    }

    #[test]
    fn test_canonical_ignores_absent_fields() {
        let a = BookFilters::page(1, 10);
        let b = BookFilters {
            title: Some(String::new()),
            ..BookFilters::page(1, 10)
        };
        assert_eq!(a.canonical(), b.canonical());
        assert_ne!(a.canonical(), BookFilters::page(2, 10).canonical());
    }

    #[test]
    fn test_user_filter_role() {
        let filters = UserFilters {
            role: Some(Role::Admin),
            ..Default::default()
        };
        assert_eq!(filters.to_query_string(), "role=admin");
    }
}
