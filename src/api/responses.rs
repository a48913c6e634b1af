//! Request and response bodies
//!
//! File listings and batch results are serialized straight from the
//! storage result types.

use serde::{Deserialize, Serialize};

pub use crate::storage::{BatchDeleteResult, StoredFile};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    pub filenames: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
