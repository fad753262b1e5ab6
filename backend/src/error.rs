//! Error types of the job store and of the HTTP layer on top of it.

use crate::storage::StorageError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors reported by [`JobStore`](crate::store::JobStore) operations.
///
/// Every variant is reported before anything is written, except `Storage`,
/// which can interrupt a multi-key write halfway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The uploaded text is not usable CSV.
    #[error("failed to parse CSV: {0}")]
    CsvParse(String),

    /// A stored fragment or a backup document is not valid JSON for its shape.
    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    CsvWrite(String),

    /// The input is well formed but violates a store rule.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::CsvWrite(e.to_string())
    }
}

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not logged in")]
    Unauthorized,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("this action requires the {0} role")]
    Forbidden(common::model::user::Role),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(
                StoreError::CsvParse(_) | StoreError::JsonParse(_) | StoreError::Validation(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::CsvWrite(_) | StoreError::Storage(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}
