//! Server core functionality
//!
//! This module contains the listener, the router and the state shared by
//! the request handlers.

pub mod core;
pub mod routes;
pub mod state;

pub use self::core::Server;
pub use routes::build_router;
pub use state::AppState;
