//! Roster endpoints
//!
//! Thin handlers that translate HTTP requests into roster calls.

use crate::service::AppState;
use crate::types::{Activity, RosterSnapshot};
use crate::web::error::ApiError;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Landing page of the bundled front-end
pub const INDEX_PATH: &str = "/static/index.html";

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Confirmation body of a successful signup or unregister
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn root_handler() -> Redirect {
    Redirect::temporary(INDEX_PATH)
}

pub async fn list_activities_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RosterSnapshot>, ApiError> {
    let result = state.roster().list_activities().map_err(ApiError::from);
    observe(&state, "list_activities", &result);
    result.map(Json)
}

pub async fn get_activity_handler(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
) -> Result<Json<Activity>, ApiError> {
    let result = state
        .roster()
        .get_activity(&activity_name)
        .map_err(ApiError::from);
    observe(&state, "get_activity", &result);
    result.map(Json)
}

pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = email_from(query).and_then(|email| {
        state
            .roster()
            .signup(&activity_name, &email)
            .map_err(ApiError::from)
    });
    observe(&state, "signup", &result);
    result.map(|message| Json(MessageResponse { message }))
}

pub async fn unregister_handler(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = email_from(query).and_then(|email| {
        state
            .roster()
            .unregister(&activity_name, &email)
            .map_err(ApiError::from)
    });
    observe(&state, "unregister", &result);
    result.map(|message| Json(MessageResponse { message }))
}

fn email_from(query: Result<Query<EmailQuery>, QueryRejection>) -> Result<String, ApiError> {
    match query {
        Ok(Query(EmailQuery { email })) => Ok(email),
        Err(rejection) => {
            debug!("Rejected query string: {}", rejection.body_text());
            Err(ApiError::InvalidRequest(
                "Query parameter 'email' is required".to_string(),
            ))
        }
    }
}

fn observe<T>(state: &AppState, route: &str, result: &Result<T, ApiError>) {
    let status = match result {
        Ok(_) => 200,
        Err(e) => e.status_code().as_u16(),
    };
    state.metrics_collector().record_http_request(route, status);
}
