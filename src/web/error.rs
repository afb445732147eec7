//! HTTP error mapping
//!
//! Every error leaves the service as `{"detail": "..."}` with a status code
//! derived from the roster error kind.

use crate::error::RosterError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("{0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Roster(RosterError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Roster(RosterError::AlreadyRegistered { .. })
            | ApiError::Roster(RosterError::NotRegistered { .. })
            | ApiError::Roster(RosterError::Full { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Roster(RosterError::Internal { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match &self {
            ApiError::Roster(RosterError::Internal { message }) => {
                error!("Internal roster error: {}", message);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                RosterError::NotFound {
                    activity: "Nonexistent Club".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                RosterError::AlreadyRegistered {
                    activity: "Chess Club".to_string(),
                    email: "michael@mergington.edu".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                RosterError::NotRegistered {
                    activity: "Chess Club".to_string(),
                    email: "x@mergington.edu".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                RosterError::Full {
                    activity: "Chess Club".to_string(),
                    capacity: 12,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                RosterError::Internal {
                    message: "poisoned".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status_code(), expected);
        }

        assert_eq!(
            ApiError::InvalidRequest("missing email".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let response = ApiError::from(RosterError::Internal {
            message: "Failed to acquire roster write lock".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.detail, "Internal server error");
    }
}
