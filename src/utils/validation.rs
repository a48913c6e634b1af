//! Input validation utilities
//!
//! Cheap checks applied to untrusted input before any expensive work is done.

/// Upper bound for usernames submitted at login.
pub const MAX_CREDENTIAL_LENGTH: usize = 1024;

/// Validate that input is not empty and doesn't contain control characters
/// that have no business in a credential.
pub fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.is_empty() && input.len() <= max_length && !input.contains(['\0', '\r', '\n'])
}
