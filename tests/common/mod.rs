//! Helpers for driving the router in-process against the memory store.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use inkpot::{app::build_app, state::AppState, users::repo_types::UserDeletePolicy};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            app: build_app(AppState::fake()),
        }
    }

    pub fn with_policy(policy: UserDeletePolicy) -> Self {
        Self {
            app: build_app(AppState::fake_with_policy(policy)),
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        match body {
            Some(json) => {
                self.send_raw(method, uri, Some("application/json"), &json.to_string())
                    .await
            }
            None => self.send_raw(method, uri, None, "").await,
        }
    }

    /// Sends `body` verbatim, with `content_type` if given.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let response = self
            .app
            .clone()
            .oneshot(builder.body(Body::from(body.to_owned())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, text) = self.send(method, uri, body).await;
        let value = serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("expected JSON from {uri}, got {text:?}: {e}"));
        (status, value)
    }

    /// Creates a user and returns its id.
    pub async fn create_user(&self, email: &str) -> i64 {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/users",
                Some(serde_json::json!({ "email": email, "password": "secret" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["user"]["id"].as_i64().unwrap()
    }

    /// Creates an article and returns its id.
    pub async fn create_article(&self, user_id: i64, title: &str, body: &str) -> i64 {
        let (status, json) = self
            .json(
                Method::POST,
                "/api/articles",
                Some(serde_json::json!({ "title": title, "body": body, "user_id": user_id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        json["article"]["id"].as_i64().unwrap()
    }
}
