use bookportal_core::{Book, BookFilters, CreateBook, MessageResponse, Paginated, Result, UpdateBook};
use tracing::debug;

use super::invalidate_all;
use super::keys::{book_keys, feedback_keys, stats_keys};
use crate::query::{QueryClient, QueryResult};
use crate::resources::BooksClient;

#[derive(Debug, Clone)]
pub struct BookQueries {
    client: BooksClient,
    cache: QueryClient,
}

impl BookQueries {
    pub fn new(client: BooksClient, cache: QueryClient) -> Self {
        Self { client, cache }
    }

    pub async fn list(&self, filters: &BookFilters) -> Result<QueryResult<Paginated<Book>>> {
        let client = self.client.clone();
        let owned = filters.clone();
        self.cache
            .get_or_revalidate(&book_keys::list(filters), move || async move {
                client.list(&owned).await
            })
            .await
    }

    pub async fn get(&self, id: i64) -> Result<QueryResult<Book>> {
        let client = self.client.clone();
        self.cache
            .get_or_revalidate(&book_keys::detail(id), move || async move {
                client.get(id).await
            })
            .await
    }

    pub async fn create(&self, input: &CreateBook) -> Result<Book> {
        let book = self.client.create(input).await?;
        self.cache.set_query_data(&book_keys::detail(book.id), &book)?;
        invalidate_all(&self.cache, &[book_keys::lists(), stats_keys::all()]);
        debug!(book_id = book.id, "book created");
        Ok(book)
    }

    /// Reviews embed book data, so they are refreshed too.
    pub async fn update(&self, id: i64, input: &UpdateBook) -> Result<Book> {
        let book = self.client.update(id, input).await?;
        self.cache.set_query_data(&book_keys::detail(book.id), &book)?;
        invalidate_all(&self.cache, &[book_keys::lists(), feedback_keys::all()]);
        debug!(book_id = book.id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        let response = self.client.delete(id).await?;
        self.after_delete(&[id]);
        Ok(response)
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<MessageResponse> {
        let response = self.client.bulk_delete(ids).await?;
        self.after_delete(ids);
        Ok(response)
    }

    fn after_delete(&self, ids: &[i64]) {
        for id in ids {
            self.cache.remove(&book_keys::detail(*id));
        }
        invalidate_all(
            &self.cache,
            &[book_keys::all(), feedback_keys::all(), stats_keys::all()],
        );
        debug!(count = ids.len(), "books deleted");
    }
}
