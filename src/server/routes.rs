//! Router assembly
//!
//! Public routes: `/login`, `/files/{name}` and the browser UI fallback.
//! Everything else requires a bearer token.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::api::handlers;
use crate::config::ServerConfig;
use crate::middleware::{log_request, require_bearer};
use crate::server::AppState;

pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let protected = Router::new()
        .route("/list-files", get(handlers::list_files))
        .route("/upload", post(handlers::upload))
        .route("/delete/", delete(handlers::delete_without_name))
        .route("/delete/{*name}", delete(handlers::delete_file))
        .route("/delete-batch", post(handlers::delete_batch))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer,
        ));

    Router::new()
        .route("/login", post(handlers::login))
        .merge(protected)
        .nest_service("/files", ServeDir::new(state.store.root()))
        .fallback_service(ServeDir::new(config.frontend_root()))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
