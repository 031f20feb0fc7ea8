use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::Deserialize;

use super::ProblemMetadata;
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    extract::{PathParam, QueryParams},
    metrics, validation,
};

/// Create the catalog routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/catalog/search", get(search_by_id))
        .route("/catalog/problems/{slug}", get(fetch_by_slug))
}

#[derive(Deserialize)]
struct SearchQuery {
    id: u32,
}

async fn search_by_id(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> Result<Json<ProblemMetadata>, ApiError> {
    let result = state.catalog.search_by_id(query.id).await;
    metrics::record_catalog_lookup("search", &result);

    result?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No catalog problem with id {}", query.id)))
}

async fn fetch_by_slug(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    PathParam(slug): PathParam<String>,
) -> Result<Json<ProblemMetadata>, ApiError> {
    validation::validate_slug(&slug)?;

    let result = state.catalog.fetch_by_slug(&slug).await;
    metrics::record_catalog_lookup("slug", &result);

    result?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No catalog problem with slug '{slug}'")))
}
