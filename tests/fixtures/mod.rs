//! Test fixtures and helpers for driving the roster service over HTTP

#![allow(dead_code)]

use activity_roster::config::AppConfig;
use activity_roster::service::AppState;
use activity_roster::web::build_router;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot
use url::Url;

/// A fresh service over the built-in seed
pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// Send a request and return the raw response
    pub async fn request(&self, method: Method, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Send a request and decode the JSON body
    pub async fn json(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = self.request(method, uri).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn activities(&self) -> Value {
        let (status, body) = self.json(Method::GET, "/activities").await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    pub async fn participants(&self, activity: &str) -> Vec<String> {
        let activities = self.activities().await;
        activities[activity]["participants"]
            .as_array()
            .expect("participants should be an array")
            .iter()
            .map(|p| p.as_str().unwrap().to_string())
            .collect()
    }

    pub async fn signup(&self, activity: &str, email: &str) -> (StatusCode, Value) {
        self.json(Method::POST, &action_uri(activity, "signup", email))
            .await
    }

    pub async fn unregister(&self, activity: &str, email: &str) -> (StatusCode, Value) {
        self.json(Method::POST, &action_uri(activity, "unregister", email))
            .await
    }
}

/// `/activities/<activity>/<action>?email=<email>` with the parts percent-encoded
pub fn action_uri(activity: &str, action: &str, email: &str) -> String {
    let mut url = Url::parse("http://localhost/").unwrap();
    url.path_segments_mut()
        .unwrap()
        .pop_if_empty()
        .extend(["activities", activity, action]);
    url.query_pairs_mut().append_pair("email", email);

    format!("{}?{}", url.path(), url.query().unwrap_or_default())
}
