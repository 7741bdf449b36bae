use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use media::UploadError;
use sea_orm::DbErr;
use serde::Serialize;

use crate::store::StoreError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `OWNER_NOT_FOUND`, `EMPTY_PAYLOAD`, `PAYLOAD_TOO_LARGE`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Image not found")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    /// The referenced owning recipe does not exist.
    InvalidOwner(String),
    EmptyPayload,
    PayloadTooLarge {
        limit: usize,
    },
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::InvalidOwner(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "OWNER_NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::EmptyPayload => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "EMPTY_PAYLOAD",
                    message: "Empty file".into(),
                },
            ),
            AppError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    code: "PAYLOAD_TOO_LARGE",
                    message: format!("File too large. Maximum size is {limit} bytes"),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Empty => AppError::EmptyPayload,
            UploadError::TooLarge { limit, .. } => AppError::PayloadTooLarge { limit },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound("Image not found".into()),
            StoreError::OwnerNotFound(id) => {
                tracing::warn!("Owner recipe {id} does not exist");
                AppError::InvalidOwner(format!("Recipe {id} not found"))
            }
            StoreError::Database(e) => AppError::Internal(e.to_string()),
        }
    }
}
