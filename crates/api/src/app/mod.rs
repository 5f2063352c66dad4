//! HTTP API application wiring (Axum router + shared query service).
//!
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use joyas_infra::{InventoryQueries, SqlPool};

use crate::middleware;

pub mod errors;
pub mod routes;

/// Query service shared by every request handler.
pub type SharedQueries = Arc<InventoryQueries<Arc<dyn SqlPool>>>;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(pool: Arc<dyn SqlPool>) -> Router {
    let queries: SharedQueries = Arc::new(InventoryQueries::new(pool));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(queries))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(middleware::request_logger)),
        )
}
