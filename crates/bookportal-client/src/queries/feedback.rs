use bookportal_core::{
    CreateFeedback, Feedback, FeedbackFilters, MessageResponse, ModerateFeedback, PageRequest,
    Paginated, RatingStats, Result, UpdateFeedback,
};
use tracing::debug;

use super::invalidate_all;
use super::keys::{feedback_keys, stats_keys};
use crate::query::{QueryClient, QueryResult};
use crate::resources::FeedbackClient;

#[derive(Debug, Clone)]
pub struct FeedbackQueries {
    client: FeedbackClient,
    cache: QueryClient,
}

impl FeedbackQueries {
    pub fn new(client: FeedbackClient, cache: QueryClient) -> Self {
        Self { client, cache }
    }

    pub async fn list(&self, filters: &FeedbackFilters) -> Result<QueryResult<Paginated<Feedback>>> {
        let client = self.client.clone();
        let owned = filters.clone();
        self.cache
            .get_or_revalidate(&feedback_keys::list(filters), move || async move {
                client.list(&owned).await
            })
            .await
    }

    pub async fn for_book(
        &self,
        book_id: i64,
        page: &PageRequest,
    ) -> Result<QueryResult<Paginated<Feedback>>> {
        let client = self.client.clone();
        let owned = *page;
        self.cache
            .get_or_revalidate(&feedback_keys::by_book(book_id, page), move || async move {
                client.for_book(book_id, &owned).await
            })
            .await
    }

    pub async fn book_stats(&self, book_id: i64) -> Result<QueryResult<RatingStats>> {
        let client = self.client.clone();
        self.cache
            .get_or_revalidate(&feedback_keys::stats(book_id), move || async move {
                client.book_stats(book_id).await
            })
            .await
    }

    pub async fn mine(&self, page: &PageRequest) -> Result<QueryResult<Paginated<Feedback>>> {
        let client = self.client.clone();
        let owned = *page;
        self.cache
            .get_or_revalidate(&feedback_keys::mine(page), move || async move {
                client.mine(&owned).await
            })
            .await
    }

    pub async fn get(&self, id: i64) -> Result<QueryResult<Feedback>> {
        let client = self.client.clone();
        self.cache
            .get_or_revalidate(&feedback_keys::detail(id), move || async move {
                client.get(id).await
            })
            .await
    }

    /// A duplicate review comes back as a 409 carrying the server's message.
    pub async fn create(&self, input: &CreateFeedback) -> Result<Feedback> {
        let feedback = self.client.create(input).await?;
        self.cache
            .set_query_data(&feedback_keys::detail(feedback.id), &feedback)?;
        invalidate_all(
            &self.cache,
            &[
                feedback_keys::lists(),
                feedback_keys::by_book_prefix(input.book_id),
                feedback_keys::mine_all(),
                feedback_keys::stats(input.book_id),
                stats_keys::all(),
            ],
        );
        debug!(feedback_id = feedback.id, book_id = input.book_id, "feedback created");
        Ok(feedback)
    }

    pub async fn update(&self, id: i64, input: &UpdateFeedback) -> Result<Feedback> {
        let feedback = self.client.update(id, input).await?;
        self.after_edit(&feedback)?;
        Ok(feedback)
    }

    pub async fn moderate(&self, id: i64, input: &ModerateFeedback) -> Result<Feedback> {
        let feedback = self.client.moderate(id, input).await?;
        self.after_edit(&feedback)?;
        Ok(feedback)
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

    fn after_edit(&self, feedback: &Feedback) -> Result<()> {
        self.cache
            .set_query_data(&feedback_keys::detail(feedback.id), feedback)?;
        invalidate_all(
            &self.cache,
            &[
                feedback_keys::lists(),
                feedback_keys::by_book_all(),
                feedback_keys::mine_all(),
                feedback_keys::stats_all(),
            ],
        );
        debug!(feedback_id = feedback.id, "feedback updated");
        Ok(())
    }

    fn after_delete(&self, ids: &[i64]) {
        for id in ids {
            self.cache.remove(&feedback_keys::detail(*id));
        }
        invalidate_all(&self.cache, &[feedback_keys::all(), stats_keys::all()]);
        debug!(count = ids.len(), "feedback deleted");
    }
}
