use axum::Router;

pub mod joyas;
pub mod system;

/// Router for all inventory endpoints.
pub fn router() -> Router {
    Router::new().nest("/joyas", joyas::router())
}
