//! Error handlers
//!
//! Converts domain errors into HTTP responses at the handler boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use std::io::ErrorKind;

use crate::error::types::{ApiError, AuthError, StorageError};

/// Convert error to HTTP status code
pub fn error_to_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (error_to_status(&self), self.to_string()).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid username or password".into())
            }
            AuthError::MissingToken => ApiError::Unauthorized("Unauthorized access".into()),
            AuthError::InvalidToken(_) => ApiError::Unauthorized("Invalid token".into()),
            AuthError::MalformedHash(_) | AuthError::Hashing(_) | AuthError::Signing(_) => {
                error!("Authentication failure: {}", err);
                ApiError::Internal("Failed to generate token".into())
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileNotFound(_) => ApiError::NotFound("File not found".into()),
            StorageError::InvalidFileName(_) => ApiError::BadRequest("Invalid file name".into()),
            StorageError::UploadInterrupted(e) if e.kind() == ErrorKind::FileTooLarge => {
                warn!("Upload exceeded the body limit: {}", e);
                ApiError::PayloadTooLarge("Upload exceeds the size limit".into())
            }
            StorageError::UploadInterrupted(e) => {
                warn!("Upload aborted by client: {}", e);
                ApiError::BadRequest("Upload was interrupted".into())
            }
            StorageError::IoError(e) => {
                error!("Storage failure: {}", e);
                ApiError::Internal("Internal server error".into())
            }
        }
    }
}
