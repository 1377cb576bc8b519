//! One object wiring session, HTTP client, cache and route guard together.

use std::sync::Arc;

use bookportal_auth::{GuardDecision, RouteGuard, SessionStorage, SessionStore};
use bookportal_config::ClientConfig;
use bookportal_core::Result;

use crate::http::ApiClient;
use crate::navigator::{LogNavigator, Navigator};
use crate::queries::{AuthQueries, BookQueries, FeedbackQueries, StatsQueries, UserQueries};
use crate::query::QueryClient;
use crate::resources::{AuthClient, BooksClient, FeedbackClient, UsersClient};

/// Entry point for front ends.
///
/// ```no_run
/// # async fn run() -> bookportal_core::Result<()> {
/// use bookportal_client::Portal;
/// use bookportal_config::ClientConfig;
/// use bookportal_core::BookFilters;
///
/// let portal = Portal::builder(ClientConfig::default()).build()?;
/// let page = portal.books().list(&BookFilters::page(1, 10)).await?;
/// println!("{} books", page.data.total);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Portal {
    config: ClientConfig,
    session: SessionStore,
    cache: QueryClient,
    guard: RouteGuard,
    auth: AuthQueries,
    books: BookQueries,
    feedback: FeedbackQueries,
    users: UserQueries,
    stats: StatsQueries,
}

impl Portal {
    pub fn builder(config: ClientConfig) -> PortalBuilder {
        PortalBuilder {
            config,
            session: None,
            navigator: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn cache(&self) -> &QueryClient {
        &self.cache
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn auth(&self) -> &AuthQueries {
        &self.auth
    }

    pub fn books(&self) -> &BookQueries {
        &self.books
    }

    pub fn feedback(&self) -> &FeedbackQueries {
        &self.feedback
    }

    pub fn users(&self) -> &UserQueries {
        &self.users
    }

    pub fn stats(&self) -> &StatsQueries {
        &self.stats
    }

    /// Run the route guard for `path` against the current session.
    pub fn navigate(&self, path: &str) -> GuardDecision {
        self.guard.check(&self.session, path)
    }
}

pub struct PortalBuilder {
    config: ClientConfig,
    session: Option<SessionStore>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl PortalBuilder {
    /// Persist the session with `storage`. Defaults to memory only.
    #[must_use]
    pub fn with_session_storage(mut self, storage: impl SessionStorage + 'static) -> Self {
        self.session = Some(SessionStore::new(storage));
        self
    }

    /// Share an existing store, e.g. one the front end already subscribes to.
    #[must_use]
    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Hydrates the session store and wires every component.
    pub fn build(self) -> Result<Portal> {
        let session = self.session.unwrap_or_else(SessionStore::in_memory);
        session.initialize();

        let navigator = self.navigator.unwrap_or_else(|| Arc::new(LogNavigator));
        let api = Arc::new(
            ApiClient::new(&self.config.api, session.clone())?
                .with_navigator(navigator)
                .with_login_path(self.config.routes.login.clone()),
        );
        let cache = QueryClient::new(&self.config.cache);

        let books_client = BooksClient::new(Arc::clone(&api));
        let feedback_client = FeedbackClient::new(Arc::clone(&api));
        let users_client = UsersClient::new(Arc::clone(&api));

        Ok(Portal {
            guard: RouteGuard::new(&self.config.routes),
            auth: AuthQueries::new(
                AuthClient::new(Arc::clone(&api)),
                cache.clone(),
                session.clone(),
            ),
            books: BookQueries::new(books_client.clone(), cache.clone()),
            feedback: FeedbackQueries::new(feedback_client.clone(), cache.clone()),
            users: UserQueries::new(users_client.clone(), cache.clone()),
            stats: StatsQueries::new(books_client, users_client, feedback_client, cache.clone()),
            config: self.config,
            session,
            cache,
        })
    }
}
