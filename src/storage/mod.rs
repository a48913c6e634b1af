//! File storage management
//!
//! Handles file operations, storage naming and path validation.

pub mod naming;
pub mod operations;
pub mod results;
pub mod validation;

pub use naming::{to_original_name, to_storage_name};
pub use operations::FileStore;
pub use results::{BatchDeleteResult, StoredFile};
pub use validation::is_safe_relative_path;
