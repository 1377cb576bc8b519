use bookportal_core::{
    BookFilters, ClientError, DashboardStats, FeedbackFilters, Result, UserFilters,
};

use super::keys::stats_keys;
use crate::query::{QueryClient, QueryResult};
use crate::resources::{BooksClient, FeedbackClient, UsersClient};

/// Admin dashboard counters.
#[derive(Debug, Clone)]
pub struct StatsQueries {
    books: BooksClient,
    users: UsersClient,
    feedback: FeedbackClient,
    cache: QueryClient,
}

impl StatsQueries {
    pub fn new(
        books: BooksClient,
        users: UsersClient,
        feedback: FeedbackClient,
        cache: QueryClient,
    ) -> Self {
        Self {
            books,
            users,
            feedback,
            cache,
        }
    }

    /// Totals of books, accounts and reviews, read from the `total` of three
    /// one-item list requests issued concurrently.
    pub async fn dashboard(&self) -> Result<QueryResult<DashboardStats>> {
        let books = self.books.clone();
        let users = self.users.clone();
        let feedback = self.feedback.clone();
        self.cache
            .get_or_revalidate(&stats_keys::dashboard(), move || async move {
                let user_filters = UserFilters {
                    page: Some(1),
                    limit: Some(1),
                    ..UserFilters::default()
                };
                let book_filters = BookFilters::page(1, 1);
                let feedback_filters = FeedbackFilters::page(1, 1);
                let (books, users, feedback) = tokio::try_join!(
                    books.list(&book_filters),
                    users.list(&user_filters),
                    feedback.list(&feedback_filters),
                )?;
                Ok::<_, ClientError>(DashboardStats {
                    total_books: books.total,
                    total_users: users.total,
                    total_feedback: feedback.total,
                })
            })
            .await
    }
}
