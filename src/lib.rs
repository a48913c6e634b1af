//! Filebox - a single-user authenticated file drop.
//!
//! Clients log in with the configured username and password to obtain a
//! bearer token, then list, upload, delete and batch-delete files kept in a
//! single directory. Downloads are served publicly from `/files/`.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::ServerConfig;
pub use server::Server;
