//! Mapping of service errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use patient_records_core::{ServiceError, ValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Errors a handler can return.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Conflict(_) | ServiceError::BadRequest(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Service(ServiceError::Validation(_)) | ApiError::MalformedBody(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Service(ServiceError::CorruptRecord { .. } | ServiceError::Storage(_))
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body: a message, or the list of failed field constraints.
#[derive(Serialize)]
#[serde(untagged)]
enum Detail<'a> {
    Message(String),
    Violations(&'a [patient_records_core::FieldViolation]),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: Detail<'a>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = ?self, %status, "request rejected");
        }

        let detail = match &self {
            ApiError::Service(ServiceError::Validation(ValidationError { violations })) => {
                Detail::Violations(violations)
            }
            other => Detail::Message(other.to_string()),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_records_core::{FieldViolation, ViolationKind};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::NotFound("P1".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("P1".into()), StatusCode::BAD_REQUEST),
            (ServiceError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (
                ServiceError::Validation(ValidationError {
                    violations: vec![FieldViolation::new("age", ViolationKind::Missing, "field required")],
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::CorruptRecord {
                    id: "P1".into(),
                    source: ValidationError { violations: vec![] },
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
        assert_eq!(
            ApiError::MalformedBody("eof".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_lookup_errors_keep_id_out_of_detail() {
        let cases = [
            (ServiceError::NotFound("P001".into()), "Patient not found"),
            (
                ServiceError::Conflict("P001".into()),
                "Patient with this ID already exists",
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body, serde_json::json!({ "detail": expected }));
        }
    }
}
