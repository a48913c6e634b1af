//! HTTP API
//!
//! Request handlers and the JSON shapes they exchange with clients.

pub mod handlers;
pub mod responses;
