//! Utility functions
//!
//! Provides logging setup, input validation and clock helpers.

pub mod logging;
pub mod time;
pub mod validation;

pub use time::unix_now;
