//! Key factories, one module per resource family.
//!
//! Broader keys are prefixes of narrower ones, so `book_keys::lists()`
//! covers every `book_keys::list(..)` regardless of filters.

pub mod book_keys {
    use bookportal_core::BookFilters;

    use crate::query::{Family, QueryKey, Tag};

    pub fn all() -> QueryKey {
        QueryKey::family(Family::Books)
    }

    pub fn lists() -> QueryKey {
        all().tag(Tag::List)
    }

    pub fn list(filters: &BookFilters) -> QueryKey {
        lists().filter(filters)
    }

    pub fn detail(id: i64) -> QueryKey {
        all().tag(Tag::Detail).id(id)
    }
}

pub mod feedback_keys {
    use bookportal_core::{FeedbackFilters, PageRequest};

    use crate::query::{Family, QueryKey, Tag};

    pub fn all() -> QueryKey {
        QueryKey::family(Family::Feedback)
    }

    pub fn lists() -> QueryKey {
        all().tag(Tag::List)
    }

    pub fn list(filters: &FeedbackFilters) -> QueryKey {
        lists().filter(filters)
    }

    pub fn by_book_all() -> QueryKey {
        all().tag(Tag::ByBook)
    }

    /// Every page of reviews for one book.
    pub fn by_book_prefix(book_id: i64) -> QueryKey {
        by_book_all().id(book_id)
    }

    pub fn by_book(book_id: i64, page: &PageRequest) -> QueryKey {
        by_book_prefix(book_id).filter(page)
    }

    pub fn mine_all() -> QueryKey {
        all().tag(Tag::Mine)
    }

    pub fn mine(page: &PageRequest) -> QueryKey {
        mine_all().filter(page)
    }

    pub fn stats_all() -> QueryKey {
        all().tag(Tag::Stats)
    }

    pub fn stats(book_id: i64) -> QueryKey {
        stats_all().id(book_id)
    }

    pub fn detail(id: i64) -> QueryKey {
        all().tag(Tag::Detail).id(id)
    }
}

pub mod user_keys {
    use bookportal_core::UserFilters;

    use crate::query::{Family, QueryKey, Tag};

    pub fn all() -> QueryKey {
        QueryKey::family(Family::Users)
    }

    pub fn lists() -> QueryKey {
        all().tag(Tag::List)
    }

    pub fn list(filters: &UserFilters) -> QueryKey {
        lists().filter(filters)
    }

    pub fn detail(id: i64) -> QueryKey {
        all().tag(Tag::Detail).id(id)
    }
}

pub mod auth_keys {
    use crate::query::{Family, QueryKey, Tag};

    pub fn all() -> QueryKey {
        QueryKey::family(Family::Auth)
    }

    pub fn profile() -> QueryKey {
        all().tag(Tag::Profile)
    }
}

pub mod stats_keys {
    use crate::query::{Family, QueryKey, Tag};

    pub fn all() -> QueryKey {
        QueryKey::family(Family::Stats)
    }

    pub fn dashboard() -> QueryKey {
        all().tag(Tag::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookportal_core::{BookFilters, FeedbackFilters, PageRequest};

    #[test]
    fn test_list_keys_sit_under_their_family() {
        let list = book_keys::list(&BookFilters::page(1, 10));
        assert!(list.starts_with(&book_keys::lists()));
        assert!(list.starts_with(&book_keys::all()));
        assert!(!book_keys::detail(1).starts_with(&book_keys::lists()));
    }

    #[test]
    fn test_feedback_by_book_prefixes() {
        let page = feedback_keys::by_book(4, &PageRequest::new(2, 5));
        assert!(page.starts_with(&feedback_keys::by_book_prefix(4)));
        assert!(!page.starts_with(&feedback_keys::by_book_prefix(5)));
        assert!(page.starts_with(&feedback_keys::by_book_all()));
        assert!(!page.starts_with(&feedback_keys::lists()));
        assert!(
            feedback_keys::list(&FeedbackFilters::page(1, 10)).starts_with(&feedback_keys::lists())
        );
    }

    #[test]
    fn test_stats_keys_are_aggregate() {
        assert!(feedback_keys::stats(1).is_aggregate());
        assert!(stats_keys::dashboard().is_aggregate());
        assert!(!auth_keys::profile().is_aggregate());
    }
}
