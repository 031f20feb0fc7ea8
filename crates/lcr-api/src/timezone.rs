//! Caller timezone resolution.
//!
//! Timestamps are stored and compared in UTC. Only the calendar-day decisions
//! (what is due today, which day a revision counts towards) look at a timezone:
//! the one the client sends, or the configured default.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

use crate::error::ApiError;

/// Largest offset from UTC in use anywhere (UTC+14:00 / UTC-14:00), in minutes
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// `?tz_offset_minutes=` query parameter, minutes east of UTC
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TzQuery {
    pub tz_offset_minutes: Option<i32>,
}

impl TzQuery {
    /// The caller's offset, or `default` when none was sent.
    pub fn resolve(&self, default: FixedOffset) -> Result<FixedOffset, ApiError> {
        match self.tz_offset_minutes {
            None => Ok(default),
            Some(minutes) => offset_from_minutes(minutes).ok_or_else(|| {
                ApiError::Validation(format!(
                    "tz_offset_minutes must be between -{MAX_OFFSET_MINUTES} and {MAX_OFFSET_MINUTES}, got {minutes}"
                ))
            }),
        }
    }
}

pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}

/// `now` as seen on the caller's wall clock.
pub fn local_now(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    now.with_timezone(&offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_from_minutes() {
        assert_eq!(offset_from_minutes(0).unwrap().local_minus_utc(), 0);
        assert_eq!(offset_from_minutes(-300).unwrap().local_minus_utc(), -18000);
        assert_eq!(offset_from_minutes(840).unwrap().local_minus_utc(), 50400);
        assert!(offset_from_minutes(841).is_none());
        assert!(offset_from_minutes(-841).is_none());
    }

    #[test]
    fn test_resolve_defaults_when_missing() {
        let default = FixedOffset::east_opt(3600).unwrap();
        let offset = TzQuery::default().resolve(default).unwrap();
        assert_eq!(offset, default);
    }

    #[test]
    fn test_resolve_rejects_out_of_range() {
        let query = TzQuery {
            tz_offset_minutes: Some(10_000),
        };
        let result = query.resolve(FixedOffset::east_opt(0).unwrap());
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_local_now_changes_calendar_day() {
        let now: DateTime<Utc> = "2024-03-10T23:30:00Z".parse().unwrap();
        let tokyo = offset_from_minutes(540).unwrap();

        assert_eq!(
            local_now(now, tokyo).date_naive(),
            "2024-03-11".parse().unwrap()
        );
    }
}
