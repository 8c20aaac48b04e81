use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::files::FileStoreError;
use crate::mail::MailError;
use crate::models::clarification::Clarification;
use crate::store::StoreError;

/// A single field that failed form-level validation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields: {}", summarize_fields(.0))]
    InvalidFields(Vec<FieldError>),

    #[error("Clarification required for {} field(s)", .0.len())]
    ClarificationRequired(Vec<Clarification>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Permission denied: {operation} on {path}")]
    PermissionDenied { operation: String, path: String },

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn summarize_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                AppError::NotFound(format!("{collection} document {id} not found"))
            }
            StoreError::PermissionDenied { operation, path } => AppError::PermissionDenied {
                operation: operation.to_string(),
                path,
            },
            other => AppError::Store(other),
        }
    }
}

impl From<FileStoreError> for AppError {
    fn from(err: FileStoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::NoRecipients => AppError::Validation(err.to_string()),
            other => AppError::Mail(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match &self {
                AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
                AppError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                    None,
                ),
                AppError::InvalidFields(fields) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "One or more fields are invalid".to_string(),
                    Some(json!({ "fields": fields })),
                ),
                AppError::ClarificationRequired(clarifications) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "CLARIFICATION_REQUIRED",
                    "Answer the open clarifications before drafting".to_string(),
                    Some(json!({ "clarifications": clarifications })),
                ),
                AppError::Unauthorized => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication required".to_string(),
                    None,
                ),
                AppError::PermissionDenied { operation, path } => {
                    tracing::warn!(operation = %operation, path = %path, "Store permission denied");
                    (
                        StatusCode::FORBIDDEN,
                        "PERMISSION_DENIED",
                        "The store denied this operation".to_string(),
                        Some(json!({ "request": { "operation": operation, "path": path } })),
                    )
                }
                AppError::Store(e) => {
                    tracing::error!("Store error: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DATABASE_ERROR",
                        "A database error occurred".to_string(),
                        None,
                    )
                }
                AppError::GenerationFailed(msg) => {
                    tracing::error!("Generation failed: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "GENERATION_FAILED",
                        "generation failed".to_string(),
                        None,
                    )
                }
                AppError::Storage(msg) => {
                    tracing::error!("Storage error: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_ERROR",
                        "A storage error occurred".to_string(),
                        None,
                    )
                }
                AppError::Mail(msg) => {
                    tracing::error!("Mail error: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "MAIL_ERROR",
                        "The message could not be sent".to_string(),
                        None,
                    )
                }
                AppError::Internal(e) => {
                    tracing::error!("Internal error: {e:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                        None,
                    )
                }
            };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_fields_lists_every_field() {
        let (status, body) = body_json(AppError::InvalidFields(vec![
            FieldError::new("projectName", "is required"),
            FieldError::new("estimatedBudget", "must be a number"),
        ]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"]["fields"][1]["field"], "estimatedBudget");
    }

    #[tokio::test]
    async fn test_generation_failure_is_generic() {
        let (status, body) =
            body_json(AppError::GenerationFailed("emailBody was empty".to_string())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["message"], "generation failed");
    }

    #[tokio::test]
    async fn test_permission_denied_carries_request_context() {
        let err: AppError = StoreError::PermissionDenied {
            operation: "update",
            path: "rfps/abc".to_string(),
        }
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["details"]["request"]["path"], "rfps/abc");
    }

    #[tokio::test]
    async fn test_store_not_found_maps_to_404() {
        let err: AppError = StoreError::NotFound {
            collection: "rfps",
            id: "missing".to_string(),
        }
        .into();
        let (status, _) = body_json(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
