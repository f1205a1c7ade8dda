#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use readinggame_api::{
    config::Config,
    create_router,
    services::{vocabulary, AppState},
    storage::{MemoryStore, WordStore},
};

pub const METRICS_AUTH: &str = "scrape:secret";

pub fn test_config() -> Config {
    Config {
        rng_seed: Some(42),
        metrics_auth: METRICS_AUTH.to_string(),
        ..Config::default()
    }
}

pub async fn create_test_app() -> Router {
    create_test_app_with(test_config()).await
}

pub async fn create_test_app_with(config: Config) -> Router {
    create_test_app_parts(config).await.0
}

/// Router plus a handle on its store, for tests that need ids hidden by the API.
pub async fn create_test_app_parts(config: Config) -> (Router, Arc<MemoryStore>) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = Arc::new(MemoryStore::new());
    let app_state = Arc::new(AppState::with_stores(config, store.clone(), store.clone()));

    vocabulary::bootstrap(
        app_state.words.as_ref(),
        app_state.config.vocabulary_seed_file.as_deref(),
        &app_state.generator,
    )
    .await
    .expect("Failed to seed test vocabulary");

    (create_router(app_state), store)
}

pub async fn stored_word_id(store: &MemoryStore, text: &str) -> String {
    store
        .all_words()
        .await
        .unwrap()
        .into_iter()
        .find(|w| w.text == text)
        .map(|w| w.id)
        .unwrap_or_else(|| panic!("word {} not stored", text))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&body).into_owned())
        })
    };
    (status, json)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
    )
    .await
}

/// Looks a word up by its text in the unfiltered-by-session list.
pub async fn word_id(app: &Router, text: &str) -> String {
    let (status, words) = get_json(app, "/api/words").await;
    assert_eq!(status, StatusCode::OK);
    words
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["word"] == text)
        .and_then(|w| w["id"].as_str())
        .unwrap_or_else(|| panic!("word {} not seeded", text))
        .to_string()
}

pub fn ids(words: &Value) -> Vec<String> {
    words
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_str().unwrap().to_string())
        .collect()
}
