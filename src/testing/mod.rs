use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::app::{app, AppState};
use crate::auth::SharedSecret;
use crate::database::Datastore;

pub const TEST_USER: &str = "meliban";
pub const TEST_PASSWORD: &str = "2chatons";

/// In-process router over an in-memory store
pub struct TestContext {
    pub state: AppState,
    pub token: String,
}

/// Status plus raw body of a test response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("invalid JSON body ({}): {:?}", e, self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_seed_file(PathBuf::from("batch/quests.json"))
    }

    pub fn with_seed_file(seed_file: PathBuf) -> Self {
        let secret = SharedSecret::new(TEST_USER, TEST_PASSWORD);
        let token = secret.token().to_string();
        let state = AppState::new(Arc::new(Datastore::in_memory()), secret, seed_file);
        Self { state, token }
    }

    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    /// Send a request carrying the valid token
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.send_with_auth(method, uri, body, Some(&self.token)).await
    }

    pub async fn send_with_auth(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.dispatch(request).await
    }

    /// Send a raw body with an optional content type, carrying the valid token
    pub async fn send_raw(&self, method: Method, uri: &str, content_type: Option<&str>, body: &str) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, self.token.as_str());
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).expect("build request");
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.router().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();
        TestResponse { status, body }
    }

    /// Create a quest through the API and return the stored document
    pub async fn create_quest(&self, quest: Value) -> Value {
        let res = self.send(Method::POST, "/quests", Some(quest)).await;
        assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.text());
        res.json()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
