//! Server middleware
//!
//! Provides request logging and the bearer-token gate.

pub mod auth;
pub mod logging;

pub use auth::require_bearer;
pub use logging::log_request;
