use std::sync::Arc;

use bookportal_core::{
    Book, BookFilters, CreateBook, MessageResponse, Paginated, Result, UpdateBook, with_query,
};
use serde_json::json;

use super::require_selection;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct BooksClient {
    api: Arc<ApiClient>,
}

impl BooksClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &BookFilters) -> Result<Paginated<Book>> {
        self.api.get(&with_query("/books", filters)).await
    }

    pub async fn get(&self, id: i64) -> Result<Book> {
        self.api.get(&format!("/books/{id}")).await
    }

    pub async fn create(&self, input: &CreateBook) -> Result<Book> {
        input.validate()?;
        self.api.post("/books", input).await
    }

    pub async fn update(&self, id: i64, input: &UpdateBook) -> Result<Book> {
        input.validate()?;
        self.api.put(&format!("/books/{id}"), input).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        self.api.delete(&format!("/books/{id}")).await
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<MessageResponse> {
        require_selection(ids)?;
        self.api
            .delete_with_body("/books/bulk", &json!({ "ids": ids }))
            .await
    }
}
