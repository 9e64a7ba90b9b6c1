#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use admindesk_core::auth::{MemoryStorage, Navigator, SessionController, TokenStore};
use admindesk_core::notify::{Notice, Notifier};
use admindesk_core::ApiClient;
use serde_json::{json, Value};
use wiremock::MockServer;

#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct Harness {
    pub server: MockServer,
    pub client: ApiClient,
    pub storage: MemoryStorage,
    pub tokens: Arc<TokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

pub async fn harness() -> Harness {
    let server = MockServer::start().await;
    let (client, storage, tokens, navigator, notifier) = client_for(&server.uri());
    Harness {
        server,
        client,
        storage,
        tokens,
        navigator,
        notifier,
    }
}

pub fn client_for(
    base_url: &str,
) -> (
    ApiClient,
    MemoryStorage,
    Arc<TokenStore>,
    Arc<RecordingNavigator>,
    Arc<RecordingNotifier>,
) {
    let storage = MemoryStorage::new();
    let tokens = Arc::new(TokenStore::new(Box::new(storage.clone())));
    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let session = SessionController::new(tokens.clone(), navigator.clone());
    let client = ApiClient::new(base_url, session)
        .unwrap()
        .with_notifier(notifier.clone());
    (client, storage, tokens, navigator, notifier)
}

pub fn success(data: Value) -> Value {
    json!({
        "data": data,
        "message": "OK",
        "timestamp": "2025-03-01T08:00:00Z",
        "responseStatus": "success"
    })
}

pub fn failure(message: &str, err_msg: &str) -> Value {
    json!({
        "data": null,
        "message": message,
        "errMsg": err_msg,
        "timestamp": "2025-03-01T08:00:00Z",
        "responseStatus": "error"
    })
}

pub fn tag_json(id: &str, name: &str, parent_id: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "parentId": parent_id,
        "createdAt": "2025-01-15T09:30:00Z"
    })
}

pub fn article_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "slug": format!("{}-slug", id),
        "content": "<p>body</p>",
        "viewCount": 3
    })
}
