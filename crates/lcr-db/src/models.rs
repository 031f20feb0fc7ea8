use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Difficulty label of a practice problem (Postgres enum `problem_difficulty`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "problem_difficulty")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Problem model - a practice problem tracked for spaced revision
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Problem {
    /// Unique problem identifier
    pub id: Uuid,
    /// Owning user (indexed)
    pub user_id: Uuid,
    /// Problem title (max 255 chars)
    pub title: String,
    /// Link to the problem statement
    pub url: Option<String>,
    pub difficulty: Difficulty,
    /// Normalized topic tags
    pub topics: Vec<String>,
    /// Free-form revision notes
    pub notes: Option<String>,
    /// Saved solution snippet
    pub code: Option<String>,
    /// Number of completed review cycles (never negative)
    pub revision_count: i32,
    /// Last interaction: creation or most recent review
    pub solved_date: DateTime<Utc>,
    /// When the problem resurfaces on the dashboard
    pub next_revision_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert struct for a new problem, with its initial schedule already computed
#[derive(Debug, Clone)]
pub struct NewProblem {
    pub user_id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub difficulty: Difficulty,
    pub topics: Vec<String>,
    pub notes: Option<String>,
    pub revision_count: i32,
    pub solved_date: DateTime<Utc>,
    pub next_revision_date: DateTime<Utc>,
}

/// Schedule update written after a review event
#[derive(Debug, Clone, Copy)]
pub struct RevisionUpdate {
    pub revision_count: i32,
    pub solved_date: DateTime<Utc>,
    pub next_revision_date: DateTime<Utc>,
}

/// Number of revisions a user logged on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityDay {
    pub activity_date: NaiveDate,
    pub revisions_count: i32,
}
