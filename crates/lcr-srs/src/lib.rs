//! SRS (Spaced Repetition System) library for the revision tracker.
//!
//! This crate provides the revision schedule for practice problems: a fixed
//! interval table keyed by revision count, the absolute next-review date derived
//! from it, and the calendar-day "due" predicate used when listing problems.
//!
//! Nothing here touches the clock, the network or storage. Callers pass the
//! reference instant in explicitly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod policy;
mod scheduler;

pub use policy::{
    IntervalPolicy, STANDARD_INTERVAL_DAYS, STANDARD_SATURATION_DAYS, standard_policy,
};
pub use scheduler::{RevisionScheduler, Schedule, end_of_day, is_due};

/// Errors raised by the scheduling core.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrsError {
    /// A revision count below zero reached the scheduler.
    #[error("invalid revision count: {0} (must be non-negative)")]
    InvalidRevisionCount(i32),
    /// A custom interval table contains a zero-day interval.
    #[error("invalid interval policy: intervals must be at least one day (entry {position:?})")]
    InvalidInterval {
        /// Offending table index, `None` for the saturation interval.
        position: Option<usize>,
    },
}

/// Number of completed review cycles of a problem. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct RevisionCount(i32);

impl RevisionCount {
    /// Count of a problem that has never been reviewed.
    pub const ZERO: Self = Self(0);

    /// The count after one more review.
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Raw value, as stored in the database.
    pub const fn get(self) -> i32 {
        self.0
    }

    const fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<i32> for RevisionCount {
    type Error = SrsError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(SrsError::InvalidRevisionCount(value));
        }
        Ok(Self(value))
    }
}

impl From<RevisionCount> for i32 {
    fn from(count: RevisionCount) -> Self {
        count.0
    }
}

impl fmt::Display for RevisionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Days until the next review for `revision_count`, using the standard policy.
///
/// * 0 revisions: 3 days
/// * 1 revision: 7 days
/// * 2 revisions: 15 days
/// * 3 revisions: 30 days
/// * 4+ revisions: 60 days
pub fn days_for(revision_count: RevisionCount) -> u32 {
    standard_policy().days_for(revision_count)
}

/// Next review date for `revision_count` counted from `reference`, using the standard policy.
pub fn compute_next_review(reference: DateTime<Utc>, revision_count: RevisionCount) -> DateTime<Utc> {
    reference + standard_policy().interval_for(revision_count)
}
