//! Error types
//!
//! Defines domain-specific error types for each module of the file server.

use std::io;
use thiserror::Error;

/// Authentication module errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Missing authorization header")]
    MissingToken,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Storage module errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),
    #[error("Upload body could not be read: {0}")]
    UploadInterrupted(io::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Errors that stop the server from starting
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to bind to {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("Server I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Errors surfaced to HTTP clients.
///
/// Each variant carries the plain-text message written as the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Internal(String),
}
