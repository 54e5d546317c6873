//! HTTP client for integration testing.
//!
//! Sends requests straight into the axum router with `tower::ServiceExt::oneshot`,
//! so no socket is bound.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

/// HTTP client bound to one router instance.
#[derive(Clone)]
pub struct ApiClient {
    router: Router,
    token: Option<String>,
}

/// Status and decoded envelope of one response.
#[derive(Debug)]
pub struct ApiResult {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResult {
    pub fn success(&self) -> bool {
        self.body["success"].as_bool().unwrap_or(false)
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error(&self) -> Option<&str> {
        self.body["error"].as_str()
    }

    /// Unwraps the data, panicking if the envelope reports a failure.
    pub fn unwrap(self) -> Value {
        if !self.success() {
            panic!("request failed ({}): {}", self.status, self.body);
        }
        self.body["data"].clone()
    }

    /// The `order` values of a list response, in response order.
    pub fn orders(&self) -> Vec<i64> {
        self.data()
            .as_array()
            .map(|records| {
                records
                    .iter()
                    .filter_map(|record| record["order"].as_i64())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ApiClient {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            token: None,
        }
    }

    /// Send every request with `Authorization: Bearer <token>`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> ApiResult {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        ApiResult { status, body }
    }

    pub async fn get(&self, uri: &str) -> ApiResult {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> ApiResult {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> ApiResult {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> ApiResult {
        self.send(Method::DELETE, uri, None).await
    }
}
