// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Live room not found: {0}")]
    RoomNotFound(String),

    #[error("Anchor persistence is not configured")]
    PersistenceUnavailable,

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidSnapshot(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RoomNotFound(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PersistenceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Cache(_) | ApiError::Internal(_) | ApiError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidSnapshot(_) => "INVALID_SNAPSHOT",
            ApiError::RoomNotFound(_) => "ROOM_NOT_FOUND",
            ApiError::PersistenceUnavailable => "PERSISTENCE_UNAVAILABLE",
            ApiError::Cache(_) => "CACHE_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Join(_) => "TASK_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<roomsnap_core::Error> for ApiError {
    fn from(err: roomsnap_core::Error) -> Self {
        ApiError::InvalidSnapshot(err.to_string())
    }
}

impl From<roomsnap_processing::Error> for ApiError {
    fn from(err: roomsnap_processing::Error) -> Self {
        ApiError::InvalidSnapshot(err.to_string())
    }
}

impl From<cacache::Error> for ApiError {
    fn from(err: cacache::Error) -> Self {
        ApiError::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomsnap_core::AnchorId;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::PersistenceUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::RoomNotFound("kitchen".into()).status(),
            StatusCode::NOT_FOUND
        );

        let duplicate: ApiError =
            roomsnap_processing::Error::DuplicateAnchorId(AnchorId::new("a")).into();
        assert_eq!(duplicate.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(duplicate.code(), "INVALID_SNAPSHOT");
    }
}
