//! Revision scheduling: absolute review dates and the "due" predicate.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{IntervalPolicy, RevisionCount};

/// Revision state written back to a problem after creation or a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Number of completed review cycles.
    pub revision_count: RevisionCount,
    /// When the problem should resurface.
    pub next_revision_date: DateTime<Utc>,
}

/// Turns an [`IntervalPolicy`] into absolute review dates.
///
/// The scheduler never reads the clock: every operation takes the reference
/// instant from its caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionScheduler {
    policy: IntervalPolicy,
}

impl RevisionScheduler {
    /// Create a scheduler for the given policy.
    pub const fn new(policy: IntervalPolicy) -> Self {
        Self { policy }
    }

    /// The policy in use.
    pub const fn policy(&self) -> &IntervalPolicy {
        &self.policy
    }

    /// `reference + days_for(revision_count)`.
    pub fn compute_next_review(
        &self,
        reference: DateTime<Utc>,
        revision_count: RevisionCount,
    ) -> DateTime<Utc> {
        reference + self.policy.interval_for(revision_count)
    }

    /// Schedule for a freshly created problem.
    pub fn schedule_new(&self, created_at: DateTime<Utc>) -> Schedule {
        Schedule {
            revision_count: RevisionCount::ZERO,
            next_revision_date: self.compute_next_review(created_at, RevisionCount::ZERO),
        }
    }

    /// Schedule after a review event.
    ///
    /// The count is incremented first and the interval is taken from the
    /// incremented count.
    pub fn schedule_review(
        &self,
        reviewed_at: DateTime<Utc>,
        prior_count: RevisionCount,
    ) -> Schedule {
        let revision_count = prior_count.next();
        Schedule {
            revision_count,
            next_revision_date: self.compute_next_review(reviewed_at, revision_count),
        }
    }

    /// See [`is_due`].
    pub fn is_due<Tz: TimeZone>(
        &self,
        next_revision_date: DateTime<Utc>,
        as_of: &DateTime<Tz>,
    ) -> bool {
        is_due(next_revision_date, as_of)
    }
}

/// Whether a problem scheduled for `next_revision_date` should be listed as of `as_of`.
///
/// Due-ness is decided per calendar day in `as_of`'s timezone: anything
/// scheduled up to and including the last instant of that day is due.
pub fn is_due<Tz: TimeZone>(next_revision_date: DateTime<Utc>, as_of: &DateTime<Tz>) -> bool {
    next_revision_date <= end_of_day(as_of).with_timezone(&Utc)
}

/// Last representable instant of `as_of`'s calendar day in its own timezone.
pub fn end_of_day<Tz: TimeZone>(as_of: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = as_of.timezone();

    as_of
        .date_naive()
        .succ_opt()
        .and_then(|tomorrow| start_of_day(&tz, tomorrow))
        .map(|start| start - TimeDelta::nanoseconds(1))
        // Only reachable on the last day chrono can represent.
        .unwrap_or_else(|| as_of.clone())
}

/// First instant of `date` in `tz`, skipping over a midnight that falls in a DST gap.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    (0..24).find_map(|hour| {
        let local = date.and_hms_opt(hour, 0, 0)?;
        tz.from_local_datetime(&local).earliest()
    })
}
