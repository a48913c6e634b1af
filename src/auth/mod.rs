//! Authentication system
//!
//! Handles credential validation and stateless session tokens.

pub mod credentials;
pub mod token;
pub mod validator;

pub use credentials::{Identity, hash_password};
pub use token::{Claims, TOKEN_TTL, TokenIssuer};
pub use validator::CredentialVerifier;
