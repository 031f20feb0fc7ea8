use chrono::{DateTime, Utc};
use lcr_db::models::{Difficulty, NewProblem, Problem};
use lcr_srs::RevisionScheduler;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{error::ApiError, normalization::normalize_topics, validation};

/// Body of `POST /problems`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProblemRequest {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(url(message = "must be a valid URL"))]
    pub url: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topics: Vec<String>,
    #[validate(length(max = 20000, message = "is too long"))]
    pub notes: Option<String>,
}

impl CreateProblemRequest {
    /// Validate the request and build the row to insert for `user_id`,
    /// first scheduled from `created_at`.
    pub fn into_new_problem(
        self,
        user_id: Uuid,
        scheduler: &RevisionScheduler,
        created_at: DateTime<Utc>,
    ) -> Result<NewProblem, ApiError> {
        self.validate()?;
        validation::validate_title(&self.title)?;
        if let Some(url) = &self.url {
            validation::validate_problem_url(url)?;
        }

        let schedule = scheduler.schedule_new(created_at);

        Ok(NewProblem {
            user_id,
            title: self.title.trim().to_string(),
            url: self.url,
            difficulty: self.difficulty,
            topics: normalize_topics(&self.topics)?,
            notes: self.notes.filter(|notes| !notes.trim().is_empty()),
            revision_count: schedule.revision_count.get(),
            solved_date: created_at,
            next_revision_date: schedule.next_revision_date,
        })
    }
}

/// Body of `PATCH /problems/{id}/notes`; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateNotesRequest {
    #[validate(length(max = 20000, message = "is too long"))]
    pub notes: Option<String>,
    #[validate(length(max = 20000, message = "is too long"))]
    pub code: Option<String>,
}

impl UpdateNotesRequest {
    pub fn check(&self) -> Result<(), ApiError> {
        self.validate()?;
        if self.notes.is_none() && self.code.is_none() {
            return Err(ApiError::Validation(
                "At least one of 'notes' or 'code' is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response of `POST /revise/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionResponse {
    pub problem: Problem,
    /// Days until the problem resurfaces
    pub interval_days: u32,
}

/// Response of `GET /dashboard`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// End of the caller's current day; everything scheduled up to here is listed
    pub due_until: DateTime<Utc>,
    pub due: Vec<Problem>,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use serde_json::json;

    use super::*;

    fn request() -> CreateProblemRequest {
        CreateProblemRequest {
            title: "  Two Sum ".to_string(),
            url: Some("https://leetcode.com/problems/two-sum/".to_string()),
            difficulty: Difficulty::Easy,
            topics: vec!["Array".to_string(), "array".to_string(), "Hash  Table".to_string()],
            notes: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_new_problem_is_scheduled_from_creation() {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let user_id = Uuid::new_v4();

        let new = request()
            .into_new_problem(user_id, &RevisionScheduler::default(), created_at)
            .unwrap();

        assert_eq!(new.user_id, user_id);
        assert_eq!(new.title, "Two Sum");
        assert_eq!(new.topics, vec!["Array", "Hash Table"]);
        assert_eq!(new.notes, None);
        assert_eq!(new.revision_count, 0);
        assert_eq!(new.solved_date, created_at);
        assert_eq!(new.next_revision_date, created_at + TimeDelta::days(3));
    }

    #[test]
    fn test_create_rejects_invalid_fields() {
        let scheduler = RevisionScheduler::default();
        let now = Utc::now();

        let mut blank_title = request();
        blank_title.title = "   ".to_string();
        assert!(blank_title.into_new_problem(Uuid::new_v4(), &scheduler, now).is_err());

        let mut long_title = request();
        long_title.title = "x".repeat(256);
        assert!(long_title.into_new_problem(Uuid::new_v4(), &scheduler, now).is_err());

        let mut bad_url = request();
        bad_url.url = Some("ftp://leetcode.com/problems/two-sum".to_string());
        assert!(bad_url.into_new_problem(Uuid::new_v4(), &scheduler, now).is_err());

        let mut long_notes = request();
        long_notes.notes = Some("n".repeat(20_001));
        assert!(long_notes.into_new_problem(Uuid::new_v4(), &scheduler, now).is_err());
    }

    #[test]
    fn test_update_notes_requires_a_field() {
        assert!(UpdateNotesRequest::default().check().is_err());

        let notes_only = UpdateNotesRequest {
            notes: Some("use a hash map".to_string()),
            code: None,
        };
        assert!(notes_only.check().is_ok());

        let too_long = UpdateNotesRequest {
            notes: None,
            code: Some("c".repeat(20_001)),
        };
        assert!(too_long.check().is_err());
    }

    #[test]
    fn test_dashboard_names_its_cutoff() {
        let cutoff = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        let response = DashboardResponse {
            due_until: cutoff,
            due: vec![],
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "due_until": "2024-03-10T23:59:59Z", "due": [] }));
    }
}
