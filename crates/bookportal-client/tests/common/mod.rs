#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use bookportal_client::{EntryStatus, Navigator, Portal, QueryKey};
use bookportal_config::ClientConfig;
use bookportal_core::{Credential, Principal, Role};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Records every redirect it is asked to perform.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    count: AtomicUsize,
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(path.to_string());
    }
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = server.uri();
    config.api.timeout = Duration::from_secs(5);
    config
}

pub fn portal(server: &MockServer) -> (Portal, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let portal = Portal::builder(config_for(server))
        .with_navigator(navigator.clone())
        .build()
        .unwrap();
    (portal, navigator)
}

pub fn principal(id: i64, role: Role) -> Principal {
    Principal {
        id,
        email: format!("user{id}@example.com"),
        first_name: "Test".into(),
        last_name: format!("User{id}"),
        role,
    }
}

pub fn sign_in(portal: &Portal, role: Role, token: &str) {
    portal
        .session()
        .set_session(principal(1, role), Credential::new(token))
        .unwrap();
}

pub fn principal_json(id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("user{id}@example.com"),
        "firstName": "Test",
        "lastName": format!("User{id}"),
        "role": role,
    })
}

pub fn book_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "author": "Frank Herbert",
        "isbn": "9780441172719",
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-01T10:00:00Z",
        "createdBy": 1,
        "creator": {"id": 1, "firstName": "Test", "lastName": "User1", "email": "user1@example.com"}
    })
}

pub fn feedback_json(id: i64, book_id: i64, rating: u8, comment: &str) -> Value {
    json!({
        "id": id,
        "rating": rating,
        "comment": comment,
        "bookId": book_id,
        "userId": 1,
        "createdAt": "2024-03-02T09:30:00Z",
        "updatedAt": "2024-03-02T09:30:00Z",
        "user": {"id": 1, "firstName": "Test", "lastName": "User1"},
        "book": {"id": book_id, "title": "Dune"}
    })
}

pub fn page_json(data: Vec<Value>, total: u64, page: u32, limit: u32) -> Value {
    let total_pages = if limit == 0 {
        0
    } else {
        total.div_ceil(u64::from(limit))
    };
    json!({
        "data": data,
        "total": total,
        "page": page,
        "limit": limit,
        "totalPages": total_pages,
    })
}

/// Requests the server received for `method` and `path`.
pub async fn received(server: &MockServer, method: &str, path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == method && r.url.path() == path)
        .collect()
}

/// Wait for a background refetch to land.
pub async fn wait_until_fresh(portal: &Portal, key: &QueryKey) {
    for _ in 0..200 {
        if portal.cache().state(key).status == EntryStatus::Fresh {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{key} never became fresh");
}
