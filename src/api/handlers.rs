//! Request handlers for the file server.
//!
//! Each handler translates one HTTP endpoint into a call on the credential
//! verifier, the token issuer or the file store, and maps failures onto
//! [`ApiError`]. Protected handlers sit behind
//! [`require_bearer`](crate::middleware::require_bearer) and never check
//! tokens themselves.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Multipart, Path, State};
use axum::http::StatusCode;
use futures_util::TryStreamExt;
use log::{error, info, warn};
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;

use crate::api::responses::{
    BatchDeleteRequest, BatchDeleteResult, LoginRequest, MessageResponse, StoredFile,
    TokenResponse,
};
use crate::auth::Claims;
use crate::error::{ApiError, AuthError};
use crate::server::AppState;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// POST /login: exchanges valid credentials for a session token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(credentials) = payload.map_err(|e| bad_json(&e))?;
    let username = credentials.username.clone();

    // argon2 verification blocks for tens of milliseconds
    let verifier_state = Arc::clone(&state);
    let verified = tokio::task::spawn_blocking(move || {
        verifier_state
            .verifier
            .verify(&credentials.username, &credentials.password)
    })
    .await
    .map_err(|e| {
        error!("Credential check panicked: {}", e);
        ApiError::Internal("Internal server error".into())
    })?;

    if !verified {
        warn!("Failed login attempt for user {:?}", username);
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(&username)?;
    info!("User {:?} logged in", username);
    Ok(Json(TokenResponse { token }))
}

/// GET /list-files
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredFile>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

/// POST /upload: stores the multipart field `file` under a timestamped name.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StoredFile>, ApiError> {
    let mut multipart =
        multipart.map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e.body_text())))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid_upload(&e))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_string) else {
            return Err(ApiError::BadRequest("Upload is missing a file name".into()));
        };

        let reader = StreamReader::new(field.map_err(body_read_error));
        let stored = state.store.upload(&filename, reader).await?;
        info!("{} uploaded {}", claims.subject(), stored.unique_name);
        return Ok(Json(stored));
    }

    Err(ApiError::BadRequest(format!(
        "Missing upload field '{UPLOAD_FIELD}'"
    )))
}

/// DELETE /delete/{name}
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(&name).await?;
    info!("{} deleted {}", claims.subject(), name);
    Ok(Json(MessageResponse {
        message: format!("File '{name}' deleted successfully"),
    }))
}

/// DELETE /delete/ with nothing after the slash
pub async fn delete_without_name() -> ApiError {
    ApiError::BadRequest("File name not provided".into())
}

/// POST /delete-batch: deletes every listed name, reporting per-entry outcomes.
pub async fn delete_batch(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<BatchDeleteRequest>, JsonRejection>,
) -> Result<Json<BatchDeleteResult>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_json(&e))?;
    let result = state.store.batch_delete(request.filenames).await;

    info!(
        "Batch delete by {}: {} deleted, {} failed",
        claims.subject(),
        result.success.len(),
        result.failed.len()
    );
    Ok(Json(result))
}

/// Malformed multipart framing is the client's fault; an exceeded body
/// limit is reported as such.
fn invalid_upload(err: &MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload exceeded the body limit: {}", err);
        return ApiError::PayloadTooLarge("Upload exceeds the size limit".into());
    }
    ApiError::BadRequest(format!("Invalid upload: {}", err.body_text()))
}

/// Keeps a body limit hit recognisable once the field stream is read as
/// plain I/O.
fn body_read_error(err: MultipartError) -> io::Error {
    let kind = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        io::ErrorKind::FileTooLarge
    } else {
        io::ErrorKind::Other
    };
    io::Error::new(kind, err)
}

fn bad_json(rejection: &JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}
