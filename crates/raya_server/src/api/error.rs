//! HTTP error responses.

use crate::service::ServiceError;
use crate::store::StoreError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use derive_more::{Display, Error};
use serde::Serialize;
use tracing::{error, warn};

/// Error returned by a handler, rendered as a JSON body.
#[derive(Debug, Clone, Display, Error)]
#[display("{}: {}", status, message)]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Human-readable message.
    pub message: String,
}

/// Body of an error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: String,
    error: &'static str,
}

impl ApiError {
    /// Creates an error with the given status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Not Found.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Maps a service error, using `context` as the message when the
    /// failure is internal.
    pub fn from_service(err: ServiceError, context: &'static str) -> Self {
        let status = match &err {
            ServiceError::Move(_) => StatusCode::BAD_REQUEST,
            ServiceError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ServiceError::Store(StoreError::Conflict { .. }) => StatusCode::CONFLICT,
            ServiceError::Store(StoreError::Corrupted { .. }) => StatusCode::BAD_REQUEST,
            ServiceError::Store(StoreError::Db(_)) | ServiceError::Task { .. } => {
                error!(error = %err, "{}", context);
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, context);
            }
        };
        let kind = match &err {
            ServiceError::Move(move_err) => move_err.kind(),
            _ => "Store",
        };
        warn!(status = %status, kind, error = %err, "Request rejected");
        Self::new(status, err.to_string())
    }

    /// Adapter for `map_err` with a fixed context.
    pub fn context(context: &'static str) -> impl FnOnce(ServiceError) -> Self {
        move |err| Self::from_service(err, context)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::from_service(err, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status_code: self.status.as_u16(),
            message: self.message,
            error: self.status.canonical_reason().unwrap_or("Error"),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbError, DbErrorKind};
    use raya_engine::{GameId, MoveError};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::Move(MoveError::GameFinished), StatusCode::BAD_REQUEST),
            (
                ServiceError::Store(StoreError::NotFound { id: GameId::new() }),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Store(StoreError::Conflict { id: GameId::new() }),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::Store(StoreError::Corrupted {
                    reason: "Corrupted board".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Store(StoreError::Db(DbError::new(DbErrorKind::Query, "boom"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ServiceError::Store(StoreError::Db(DbError::new(
            DbErrorKind::Connection,
            "secret path",
        )));
        let api = ApiError::from_service(err, "Failed to fetch games");
        assert_eq!(api.message, "Failed to fetch games");
    }

    #[test]
    fn test_move_error_message_passes_through() {
        let api = ApiError::from(ServiceError::Move(MoveError::CorruptedState));
        assert_eq!(api.message, "Invalid game state: Corrupted board");
    }
}
