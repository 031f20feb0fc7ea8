use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use chrono::Utc;
use lcr_db::{models::Problem, repositories::problem};
use uuid::Uuid;

use super::{
    model::{CreateProblemRequest, DashboardResponse, RevisionResponse, UpdateNotesRequest},
    service,
};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    extract::{JsonBody, PathParam, QueryParams},
    timezone::TzQuery,
};

/// Create the problem routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/problems", post(create_problem).get(list_problems))
        .route("/problems/{id}", get(get_problem).delete(delete_problem))
        .route("/problems/{id}/notes", patch(update_notes))
        .route("/dashboard", get(dashboard))
        .route("/revise/{id}", post(revise_problem))
}

async fn create_problem(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    QueryParams(tz): QueryParams<TzQuery>,
    JsonBody(payload): JsonBody<CreateProblemRequest>,
) -> Result<(StatusCode, Json<Problem>), ApiError> {
    let offset = tz.resolve(state.default_offset)?;

    let created =
        service::create_problem(&state, auth_user.user_id, payload, Utc::now(), offset).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_problems(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<Problem>>, ApiError> {
    let problems = problem::list_problems_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(problems))
}

async fn get_problem(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathParam(problem_id): PathParam<Uuid>,
) -> Result<Json<Problem>, ApiError> {
    let problem = service::fetch_owned(&state.pool, auth_user.user_id, problem_id).await?;
    Ok(Json(problem))
}

async fn update_notes(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathParam(problem_id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateNotesRequest>,
) -> Result<Json<Problem>, ApiError> {
    let updated =
        service::update_notes(&state.pool, auth_user.user_id, problem_id, &payload).await?;
    Ok(Json(updated))
}

async fn delete_problem(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathParam(problem_id): PathParam<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete_problem(&state.pool, auth_user.user_id, problem_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn dashboard(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    QueryParams(tz): QueryParams<TzQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let offset = tz.resolve(state.default_offset)?;
    let response = service::due_problems(&state, auth_user.user_id, Utc::now(), offset).await?;
    Ok(Json(response))
}

async fn revise_problem(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathParam(problem_id): PathParam<Uuid>,
    QueryParams(tz): QueryParams<TzQuery>,
) -> Result<Json<RevisionResponse>, ApiError> {
    let offset = tz.resolve(state.default_offset)?;
    let response =
        service::review_problem(&state, auth_user.user_id, problem_id, Utc::now(), offset).await?;
    Ok(Json(response))
}
