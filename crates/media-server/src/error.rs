//! Mapping of catalog failures onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use media_core::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Error body returned for 4xx/5xx responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors a handler can return
#[derive(Error, Debug)]
pub enum ApiError {
    /// Create body absent, unparsable, or lacking a required field
    #[error("missing fields")]
    MissingFields,

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The blocking save task died before reporting back
    #[error("save task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::Storage(StorageError::Validation { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Storage(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::MissingFields | ApiError::Storage(StorageError::Validation { .. }) => {
                "missing fields".to_string()
            }
            ApiError::Storage(e) => {
                error!(
                    error = %e,
                    hint = e.recovery_suggestion().unwrap_or("-"),
                    "Catalog storage failed"
                );
                "storage failure".to_string()
            }
            ApiError::Task(e) => {
                error!(error = %e, "Catalog save task failed");
                "storage failure".to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from(StorageError::Validation {
            fields: vec!["name"],
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingFields.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_io_failure_maps_to_internal_error() {
        let err = ApiError::from(StorageError::WriteError {
            path: PathBuf::from("media.json"),
            source: io::Error::new(io::ErrorKind::Other, "boom"),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_failed_save_task_maps_to_internal_error() {
        let join_error = tokio::spawn(async { panic!("save aborted") })
            .await
            .unwrap_err();

        let err = ApiError::from(join_error);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
