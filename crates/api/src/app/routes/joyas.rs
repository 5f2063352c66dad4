use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use joyas_core::{DomainError, ItemId};
use joyas_inventory::{project, resolve, resolve_filter};

use crate::app::{errors, SharedQueries};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_joyas))
        .route("/filtros", get(filter_joyas))
        .route("/:id", get(get_joya))
}

/// Paginated, sorted (and optionally filtered) listing with resource links.
pub async fn list_joyas(
    Extension(queries): Extension<SharedQueries>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let query = resolve(&params);

    match queries.list(&query).await {
        Ok((rows, totals)) => (StatusCode::OK, Json(project(rows, totals))).into_response(),
        Err(e) => errors::store_error_to_response("list_joyas", e),
    }
}

/// Raw rows matching the filter parameters.
pub async fn filter_joyas(
    Extension(queries): Extension<SharedQueries>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let filter = resolve_filter(&params);

    match queries.filter(&filter).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => errors::store_error_to_response("filter_joyas", e),
    }
}

pub async fn get_joya(
    Extension(queries): Extension<SharedQueries>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match queries.get(id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
        Ok(None) => errors::domain_error_to_response(DomainError::not_found()),
        Err(e) => errors::store_error_to_response("get_joya", e),
    }
}
