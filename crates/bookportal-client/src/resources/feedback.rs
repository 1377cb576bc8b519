use std::sync::Arc;

use bookportal_core::{
    CreateFeedback, Feedback, FeedbackFilters, MessageResponse, ModerateFeedback, PageRequest,
    Paginated, RatingStats, Result, UpdateFeedback, with_query,
};
use serde_json::json;

use super::require_selection;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct FeedbackClient {
    api: Arc<ApiClient>,
}

impl FeedbackClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Every review, admin view.
    pub async fn list(&self, filters: &FeedbackFilters) -> Result<Paginated<Feedback>> {
        self.api
            .get(&with_query("/feedback/all-reviews", filters))
            .await
    }

    pub async fn for_book(&self, book_id: i64, page: &PageRequest) -> Result<Paginated<Feedback>> {
        self.api
            .get(&with_query(&format!("/feedback/book/{book_id}"), page))
            .await
    }

    pub async fn book_stats(&self, book_id: i64) -> Result<RatingStats> {
        self.api
            .get(&format!("/feedback/book/{book_id}/stats"))
            .await
    }

    /// Reviews written by the signed-in principal.
    pub async fn mine(&self, page: &PageRequest) -> Result<Paginated<Feedback>> {
        self.api
            .get(&with_query("/feedback/my-feedback", page))
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Feedback> {
        self.api.get(&format!("/feedback/{id}")).await
    }

    pub async fn create(&self, input: &CreateFeedback) -> Result<Feedback> {
        input.validate()?;
        self.api.post("/feedback", input).await
    }

    pub async fn update(&self, id: i64, input: &UpdateFeedback) -> Result<Feedback> {
        input.validate()?;
        self.api.put(&format!("/feedback/{id}"), input).await
    }

    pub async fn moderate(&self, id: i64, input: &ModerateFeedback) -> Result<Feedback> {
        input.validate()?;
        self.api
            .patch(&format!("/feedback/{id}/moderate"), input)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        self.api.delete(&format!("/feedback/{id}")).await
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<MessageResponse> {
        require_selection(ids)?;
        self.api
            .delete_with_body("/feedback/bulk", &json!({ "feedbackIds": ids }))
            .await
    }
}
