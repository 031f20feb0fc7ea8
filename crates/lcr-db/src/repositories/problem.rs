use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{NewProblem, Problem, RevisionUpdate};

pub async fn insert_problem<'e, E>(executor: E, problem: &NewProblem) -> Result<Problem, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO problems (
                user_id, title, url, difficulty, topics, notes,
                revision_count, solved_date, next_revision_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
        "#,
    )
    .bind(problem.user_id)
    .bind(&problem.title)
    .bind(&problem.url)
    .bind(problem.difficulty)
    .bind(&problem.topics)
    .bind(&problem.notes)
    .bind(problem.revision_count)
    .bind(problem.solved_date)
    .bind(problem.next_revision_date)
    .fetch_one(executor)
    .await
}

pub async fn get_problem<'e, E>(executor: E, problem_id: Uuid) -> Result<Option<Problem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT * FROM problems WHERE id = $1
        "#,
    )
    .bind(problem_id)
    .fetch_optional(executor)
    .await
}

/// Fetch a problem and lock its row until the surrounding transaction ends.
///
/// Concurrent reviews of the same problem queue up here, so each one reads the
/// count written by the previous one.
pub async fn get_problem_for_update<'e, E>(
    executor: E,
    problem_id: Uuid,
) -> Result<Option<Problem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT * FROM problems WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(problem_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_problems_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<Problem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT * FROM problems
            WHERE user_id = $1
            ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Problems scheduled at or before `cutoff`, most overdue first.
pub async fn list_due_problems<'e, E>(
    executor: E,
    user_id: Uuid,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Problem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT * FROM problems
            WHERE user_id = $1 AND next_revision_date <= $2
            ORDER BY next_revision_date, created_at
        "#,
    )
    .bind(user_id)
    .bind(cutoff)
    .fetch_all(executor)
    .await
}

pub async fn apply_revision<'e, E>(
    executor: E,
    problem_id: Uuid,
    update: RevisionUpdate,
) -> Result<Problem, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE problems
            SET revision_count = $2,
                solved_date = $3,
                next_revision_date = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
        "#,
    )
    .bind(problem_id)
    .bind(update.revision_count)
    .bind(update.solved_date)
    .bind(update.next_revision_date)
    .fetch_one(executor)
    .await
}

/// Overwrite the notes and/or code of a problem. `None` keeps the stored value.
pub async fn update_notes<'e, E>(
    executor: E,
    problem_id: Uuid,
    notes: Option<&str>,
    code: Option<&str>,
) -> Result<Problem, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE problems
            SET notes = COALESCE($2, notes),
                code = COALESCE($3, code),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
        "#,
    )
    .bind(problem_id)
    .bind(notes)
    .bind(code)
    .fetch_one(executor)
    .await
}

pub async fn delete_problem<'e, E>(executor: E, problem_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM problems WHERE id = $1
        "#,
    )
    .bind(problem_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
