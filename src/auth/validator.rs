//! Authentication validator
//!
//! Checks a submitted username/password pair against the configured identity.

use super::credentials::Identity;
use crate::utils::validation::{MAX_CREDENTIAL_LENGTH, is_valid_input};

/// Validates login attempts against a single identity
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    identity: Identity,
}

impl CredentialVerifier {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// Returns true only when both the username and the password match.
    ///
    /// The password hash is checked even when the username is wrong, so the
    /// answer and its timing do not reveal which half was incorrect. Only the
    /// username is sanity-checked; any password the hash was made from works.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = is_valid_input(username, MAX_CREDENTIAL_LENGTH)
            && constant_time_eq(username.as_bytes(), self.identity.username().as_bytes());
        let password_ok = self.identity.password_matches(password);
        user_ok & password_ok
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
