use bookportal_core::{CreateUser, MessageResponse, Paginated, Result, UpdateUser, User, UserFilters};
use tracing::debug;

use super::invalidate_all;
use super::keys::{book_keys, feedback_keys, stats_keys, user_keys};
use crate::query::{QueryClient, QueryResult};
use crate::resources::UsersClient;

#[derive(Debug, Clone)]
pub struct UserQueries {
    client: UsersClient,
    cache: QueryClient,
}

impl UserQueries {
    pub fn new(client: UsersClient, cache: QueryClient) -> Self {
        Self { client, cache }
    }

    pub async fn list(&self, filters: &UserFilters) -> Result<QueryResult<Paginated<User>>> {
        let client = self.client.clone();
        let owned = filters.clone();
        self.cache
            .get_or_revalidate(&user_keys::list(filters), move || async move {
                client.list(&owned).await
            })
            .await
    }

    pub async fn get(&self, id: i64) -> Result<QueryResult<User>> {
        let client = self.client.clone();
        self.cache
            .get_or_revalidate(&user_keys::detail(id), move || async move {
                client.get(id).await
            })
            .await
    }

    pub async fn create(&self, input: &CreateUser) -> Result<User> {
        let user = self.client.create(input).await?;
        self.cache.set_query_data(&user_keys::detail(user.id), &user)?;
        invalidate_all(&self.cache, &[user_keys::lists(), stats_keys::all()]);
        debug!(user_id = user.id, "user created");
        Ok(user)
    }

    pub async fn update(&self, id: i64, input: &UpdateUser) -> Result<User> {
        let user = self.client.update(id, input).await?;
        self.cache.set_query_data(&user_keys::detail(user.id), &user)?;
        invalidate_all(&self.cache, &[user_keys::lists()]);
        debug!(user_id = user.id, "user updated");
        Ok(user)
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

    /// Deleting accounts removes their books and reviews server-side, and
    /// changes every dashboard count.
    fn after_delete(&self, ids: &[i64]) {
        for id in ids {
            self.cache.remove(&user_keys::detail(*id));
        }
        invalidate_all(
            &self.cache,
            &[
                user_keys::all(),
                book_keys::all(),
                feedback_keys::all(),
                stats_keys::all(),
            ],
        );
        debug!(count = ids.len(), "users deleted");
    }
}
