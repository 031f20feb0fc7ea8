use chrono::{DateTime, FixedOffset, Utc};
use lcr_db::{
    models::{Problem, RevisionUpdate},
    repositories::{activity, problem},
};
use lcr_srs::{RevisionCount, end_of_day};
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{CreateProblemRequest, DashboardResponse, RevisionResponse, UpdateNotesRequest};
use crate::{ApiState, error::ApiError, metrics, timezone::local_now};

/// Reject access to a problem owned by someone else.
pub fn ensure_owner(problem: &Problem, user_id: Uuid) -> Result<(), ApiError> {
    if problem.user_id != user_id {
        return Err(ApiError::Forbidden(
            "You are not allowed to access this problem".to_string(),
        ));
    }
    Ok(())
}

fn not_found(problem_id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Problem {problem_id} not found"))
}

/// Last instant of the caller's current day, in UTC.
pub fn due_cutoff(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    end_of_day(&local_now(now, offset)).with_timezone(&Utc)
}

pub async fn fetch_owned(pool: &PgPool, user_id: Uuid, problem_id: Uuid) -> Result<Problem, ApiError> {
    let problem = problem::get_problem(pool, problem_id)
        .await?
        .ok_or_else(|| not_found(problem_id))?;
    ensure_owner(&problem, user_id)?;
    Ok(problem)
}

/// Store a new problem scheduled from `now` and count it towards today's activity.
pub async fn create_problem(
    state: &ApiState,
    user_id: Uuid,
    request: CreateProblemRequest,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<Problem, ApiError> {
    let new_problem = request.into_new_problem(user_id, &state.scheduler, now)?;

    let mut tx = state.pool.begin().await?;
    let created = problem::insert_problem(&mut *tx, &new_problem).await?;
    activity::record_activity(&mut *tx, user_id, local_now(now, offset).date_naive()).await?;
    tx.commit().await?;

    metrics::record_problem_created(created.difficulty);
    tracing::info!(
        problem_id = %created.id,
        %user_id,
        next_revision_date = %created.next_revision_date,
        "Problem created"
    );

    Ok(created)
}

/// Apply a review event at `now`.
///
/// The row stays locked from read to commit, so concurrent reviews of the
/// same problem each advance the count by one.
pub async fn review_problem(
    state: &ApiState,
    user_id: Uuid,
    problem_id: Uuid,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<RevisionResponse, ApiError> {
    let mut tx = state.pool.begin().await?;

    let current = problem::get_problem_for_update(&mut *tx, problem_id)
        .await?
        .ok_or_else(|| not_found(problem_id))?;
    ensure_owner(&current, user_id)?;

    let prior = RevisionCount::try_from(current.revision_count)?;
    let schedule = state.scheduler.schedule_review(now, prior);

    let updated = problem::apply_revision(
        &mut *tx,
        problem_id,
        RevisionUpdate {
            revision_count: schedule.revision_count.get(),
            solved_date: now,
            next_revision_date: schedule.next_revision_date,
        },
    )
    .await?;
    activity::record_activity(&mut *tx, user_id, local_now(now, offset).date_naive()).await?;
    tx.commit().await?;

    let policy = state.scheduler.policy();
    metrics::record_revision(schedule.revision_count, policy.table().len());
    tracing::info!(
        %problem_id,
        %user_id,
        revision_count = %schedule.revision_count,
        next_revision_date = %schedule.next_revision_date,
        "Problem revised"
    );

    Ok(RevisionResponse {
        problem: updated,
        interval_days: policy.days_for(schedule.revision_count),
    })
}

/// Problems due by the end of the caller's current day, most overdue first.
pub async fn due_problems(
    state: &ApiState,
    user_id: Uuid,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<DashboardResponse, ApiError> {
    let as_of = local_now(now, offset);
    let cutoff = due_cutoff(now, offset);

    let due = problem::list_due_problems(&state.pool, user_id, cutoff)
        .await?
        .into_iter()
        .filter(|p| state.scheduler.is_due(p.next_revision_date, &as_of))
        .collect::<Vec<_>>();

    tracing::debug!(%user_id, %cutoff, count = due.len(), "Dashboard loaded");

    Ok(DashboardResponse {
        due_until: cutoff,
        due,
    })
}

pub async fn update_notes(
    pool: &PgPool,
    user_id: Uuid,
    problem_id: Uuid,
    request: &UpdateNotesRequest,
) -> Result<Problem, ApiError> {
    request.check()?;

    let mut tx = pool.begin().await?;

    let current = problem::get_problem_for_update(&mut *tx, problem_id)
        .await?
        .ok_or_else(|| not_found(problem_id))?;
    ensure_owner(&current, user_id)?;

    let updated = problem::update_notes(
        &mut *tx,
        problem_id,
        request.notes.as_deref(),
        request.code.as_deref(),
    )
    .await?;
    tx.commit().await?;

    tracing::debug!(%problem_id, %user_id, "Problem notes updated");

    Ok(updated)
}

pub async fn delete_problem(pool: &PgPool, user_id: Uuid, problem_id: Uuid) -> Result<(), ApiError> {
    fetch_owned(pool, user_id, problem_id).await?;

    if !problem::delete_problem(pool, problem_id).await? {
        return Err(not_found(problem_id));
    }

    tracing::info!(%problem_id, %user_id, "Problem deleted");
    Ok(())
}
