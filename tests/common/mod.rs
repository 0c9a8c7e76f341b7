#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use lifedesk::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

/// A router over its own throwaway SQLite file.
pub struct TestApp {
    pub router: Router,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

pub fn test_config() -> (Config, PathBuf) {
    let db_path = std::env::temp_dir().join(format!("lifedesk-test-{}.db", Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.ai.enabled = false;
    config.ai.api_key = String::new();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.security.argon2_parallelism = 1;

    (config, db_path)
}

pub async fn spawn_app() -> TestApp {
    let (config, db_path) = test_config();
    spawn_app_with(config, db_path).await
}

pub async fn spawn_app_with(config: Config, db_path: PathBuf) -> TestApp {
    let state = lifedesk::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: lifedesk::api::router(state),
        db_path,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        user_id: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header("X-User-Id", user_id);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, None).await
    }

    /// Registers a user and returns its id.
    pub async fn create_user(&self, username: &str) -> String {
        let (status, body) = self
            .post(
                "/api/users",
                json!({ "username": username, "password": "correct horse battery" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Creates a record and returns the stored representation.
    pub async fn create(&self, collection: &str, body: Value) -> Value {
        let (status, body) = self.post(&format!("/api/{collection}"), body).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"].clone()
    }
}

/// Paths of every issue in an error envelope.
pub fn issue_paths(body: &Value) -> Vec<String> {
    body["issues"]
        .as_array()
        .map(|issues| {
            issues
                .iter()
                .filter_map(|issue| issue["path"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
