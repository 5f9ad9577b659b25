//! Route definitions for the Plant Health Scanner Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - leaf scanning
        .nest("/scans", scan_routes())
        // Protected routes - disease catalog
        .nest("/diseases", disease_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Leaf scan routes (protected)
fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_scans).post(handlers::submit_scan))
        .route("/capture", post(handlers::submit_capture))
        .route("/recent", get(handlers::get_recent_scans))
        .route("/export", get(handlers::export_scans))
        .route("/:scan_id", get(handlers::get_scan))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Disease catalog routes (protected)
fn disease_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_diseases))
        .route("/:slug", get(handlers::get_disease))
        .route_layer(middleware::from_fn(auth_middleware))
}
