//! Router harness: temp-dir inventory plus in-memory switches.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::Config;
use crate::db::Store;
use crate::eapi::fake::FakeConnector;
use crate::models::{Switch, SwitchFacts};
use crate::{router, AppState};

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub fake: FakeConnector,
    _dir: TempDir,
}

pub async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("switches.json")).await.unwrap();
    let fake = FakeConnector::new();
    let state = Arc::new(AppState {
        store,
        config: Config::default(),
        connector: Arc::new(fake.clone()),
    });
    TestApp {
        router: router::build(state.clone(), None),
        state,
        fake,
        _dir: dir,
    }
}

/// Put a switch straight into the inventory, bypassing the connectivity test
pub async fn seed_switch(app: &TestApp, hostname: &str, ip: &str) -> Switch {
    let candidate = Switch::candidate(Some(hostname), ip, "admin", "arista");
    app.state
        .store
        .create_switch(&candidate, &SwitchFacts::default())
        .await
        .unwrap()
}

/// Send one request; non-JSON bodies come back as a JSON string
pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}
