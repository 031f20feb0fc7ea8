use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use lcr_db::{models::ActivityDay, repositories::activity};
use serde::{Deserialize, Serialize};

use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    extract::QueryParams,
    timezone::{TzQuery, local_now},
    validation::validate_activity_window,
};

const DEFAULT_DAYS: u32 = 365;

/// Create the activity routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/activity", get(get_activity))
}

#[derive(Debug, Deserialize)]
struct ActivityQuery {
    days: Option<u32>,
    tz_offset_minutes: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityResponse {
    /// First day of the window, in the caller's timezone
    pub since: NaiveDate,
    /// Today, in the caller's timezone
    pub until: NaiveDate,
    /// Days with at least one event, oldest first
    pub days: Vec<ActivityDay>,
}

/// First day of a window of `days` calendar days ending today, in the caller's timezone.
fn window_start(now: DateTime<Utc>, offset: FixedOffset, days: u32) -> (NaiveDate, NaiveDate) {
    let today = local_now(now, offset).date_naive();
    let since = today
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN);
    (since, today)
}

async fn get_activity(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    QueryParams(query): QueryParams<ActivityQuery>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    validate_activity_window(days)?;
    let offset = TzQuery {
        tz_offset_minutes: query.tz_offset_minutes,
    }
    .resolve(state.default_offset)?;

    let (since, until) = window_start(Utc::now(), offset, days);
    let days = activity::get_activity_since(&state.pool, auth_user.user_id, since).await?;

    Ok(Json(ActivityResponse { since, until, days }))
}
