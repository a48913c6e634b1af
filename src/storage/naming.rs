//! Storage naming
//!
//! Uploaded files are stored as `<unix-timestamp>-<original-filename>` so two
//! uploads of the same file land under different names. The original name is
//! recovered by splitting on the first separator.

/// Separator between the timestamp prefix and the original filename.
pub const NAME_SEPARATOR: char = '-';

/// Builds the on-disk name for a file uploaded at `now` (Unix seconds).
///
/// The original filename is embedded verbatim.
pub fn to_storage_name(original: &str, now: u64) -> String {
    format!("{now}{NAME_SEPARATOR}{original}")
}

/// Recovers the display name from an on-disk name.
///
/// Names without a separator are shown as they are.
pub fn to_original_name(storage_name: &str) -> &str {
    match storage_name.split_once(NAME_SEPARATOR) {
        Some((_, original)) => original,
        None => storage_name,
    }
}
