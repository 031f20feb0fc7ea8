use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::ActivityDay;

/// Count one creation or review event on `activity_date` for the user.
pub async fn record_activity<'e, E>(
    executor: E,
    user_id: Uuid,
    activity_date: NaiveDate,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO revision_activity (user_id, activity_date, revisions_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, activity_date)
            DO UPDATE SET revisions_count = revision_activity.revisions_count + 1
        "#,
    )
    .bind(user_id)
    .bind(activity_date)
    .execute(executor)
    .await?;
    Ok(())
}

/// Days with at least one event on or after `since`, oldest first.
pub async fn get_activity_since<'e, E>(
    executor: E,
    user_id: Uuid,
    since: NaiveDate,
) -> Result<Vec<ActivityDay>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT activity_date, revisions_count
            FROM revision_activity
            WHERE user_id = $1 AND activity_date >= $2
            ORDER BY activity_date
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(executor)
    .await
}
