#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bookshelf::bookshelf_config::AppConfig;
use bookshelf::router::init_router;
use bookshelf::state::AppState;
use bookshelf::testing::{MemoryAvatarStorage, MemoryStore};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";
pub const PUBLIC_URL: &str = "http://localhost:3000";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub avatars: Arc<MemoryAvatarStorage>,
    pub config: AppConfig,
}

pub fn test_config(pairs: &[(&str, &str)]) -> AppConfig {
    let lookup = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .or_else(|| match key {
                "JWT_SECRET" => Some(TEST_SECRET.to_string()),
                "PUBLIC_URL" => Some(PUBLIC_URL.to_string()),
                "OBSERVABILITY_ENABLED" => Some("false".to_string()),
                _ => None,
            })
    };

    AppConfig::from_lookup(&lookup).unwrap()
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(&[], MemoryAvatarStorage::new())
}

pub fn setup_test_app_with(pairs: &[(&str, &str)], avatars: MemoryAvatarStorage) -> TestApp {
    let config = test_config(pairs);
    let store = Arc::new(MemoryStore::new());
    let avatars = Arc::new(avatars);

    let state = AppState::new(&config, store.clone(), avatars.clone());

    TestApp {
        router: init_router(state),
        store,
        avatars,
        config,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("PATCH", uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("DELETE", uri, token, None)).await
    }

    /// Registers through the API and logs in. Returns the user id and token.
    pub async fn register_and_login(&self, username: &str, password: &str) -> (i64, String) {
        let (status, user) = self
            .post(
                "/register",
                None,
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", user);

        let (status, body) = self
            .post(
                "/login",
                None,
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        (
            user["id"].as_i64().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    pub async fn create_category(&self, token: &str, name: &str) {
        let (status, body) = self
            .post("/categories", Some(token), json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "category failed: {}", body);
    }

    pub async fn create_book(&self, token: &str, title: &str, category: &str) -> Value {
        let (status, body) = self
            .post("/books", Some(token), book_body(title, category))
            .await;
        assert_eq!(status, StatusCode::CREATED, "book failed: {}", body);
        body
    }
}

pub fn book_body(title: &str, category: &str) -> Value {
    json!({
        "title": title,
        "author": "Test Author",
        "description": "A book used in tests",
        "isbn13": "9780441013593",
        "pagecount": 300,
        "language": "en",
        "category": category
    })
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .map(|e| e["field"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}
