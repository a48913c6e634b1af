//! Storage result types
//!
//! Defines result structures returned by storage operations.

use serde::Serialize;

/// A file held in the storage directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub unique_name: String,
    pub original_name: String,
}

/// Per-entry outcome of a batch deletion, input order kept within each list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchDeleteResult {
    pub success: Vec<String>,
    pub failed: Vec<String>,
}
