use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::{Value, json};

use crate::{activity, catalog, problem, state::ApiState};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .merge(problem::routes())
        .merge(activity::routes())
        .merge(catalog::routes())
        .fallback(handler_404)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "The requested resource was not found" })),
    )
}
