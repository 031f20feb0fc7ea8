//! Interval policy: maps a revision count to the number of days until the next review.

use std::sync::LazyLock;

use chrono::TimeDelta;

use crate::{RevisionCount, SrsError};

/// Interval in days for the first revisions, indexed by revision count.
pub const STANDARD_INTERVAL_DAYS: [u32; 4] = [3, 7, 15, 30];

/// Interval in days once the revision count runs past the table.
pub const STANDARD_SATURATION_DAYS: u32 = 60;

static STANDARD_POLICY: LazyLock<IntervalPolicy> = LazyLock::new(IntervalPolicy::standard);

/// Shared instance of [`IntervalPolicy::standard`], built on first use.
pub fn standard_policy() -> &'static IntervalPolicy {
    &STANDARD_POLICY
}

/// Fixed lookup table of review intervals with a saturating fallback.
///
/// Count `n` maps to `table[n]` when the table has an entry for it, and to
/// `saturation_days` otherwise. The standard curve is:
///
/// | revision count | days |
/// |---|---|
/// | 0 | 3 |
/// | 1 | 7 |
/// | 2 | 15 |
/// | 3 | 30 |
/// | 4+ | 60 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalPolicy {
    table: Vec<u32>,
    saturation_days: u32,
}

impl IntervalPolicy {
    /// The standard 3 / 7 / 15 / 30 / 60 day curve.
    pub fn standard() -> Self {
        Self {
            table: STANDARD_INTERVAL_DAYS.to_vec(),
            saturation_days: STANDARD_SATURATION_DAYS,
        }
    }

    /// Build a custom curve.
    ///
    /// Every interval, including the saturation interval, must be at least one
    /// day so that a computed review date never precedes its reference time.
    pub fn new(table: Vec<u32>, saturation_days: u32) -> Result<Self, SrsError> {
        if saturation_days == 0 {
            return Err(SrsError::InvalidInterval { position: None });
        }
        if let Some(position) = table.iter().position(|&days| days == 0) {
            return Err(SrsError::InvalidInterval {
                position: Some(position),
            });
        }

        Ok(Self {
            table,
            saturation_days,
        })
    }

    /// Number of days to wait after a review that left the problem at `revision_count`.
    pub fn days_for(&self, revision_count: RevisionCount) -> u32 {
        self.table
            .get(revision_count.as_index())
            .copied()
            .unwrap_or(self.saturation_days)
    }

    /// Same as [`days_for`](Self::days_for), as a duration.
    pub fn interval_for(&self, revision_count: RevisionCount) -> TimeDelta {
        TimeDelta::days(i64::from(self.days_for(revision_count)))
    }

    /// Explicit table entries, in revision-count order.
    pub fn table(&self) -> &[u32] {
        &self.table
    }

    /// Interval used for every count past the table.
    pub const fn saturation_days(&self) -> u32 {
        self.saturation_days
    }
}

impl Default for IntervalPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(n: i32) -> RevisionCount {
        RevisionCount::try_from(n).unwrap()
    }

    #[test]
    fn test_standard_table_is_exact() {
        let policy = IntervalPolicy::standard();

        assert_eq!(policy.days_for(count(0)), 3);
        assert_eq!(policy.days_for(count(1)), 7);
        assert_eq!(policy.days_for(count(2)), 15);
        assert_eq!(policy.days_for(count(3)), 30);
    }

    #[test]
    fn test_standard_saturates_at_sixty_days() {
        let policy = IntervalPolicy::standard();

        for n in [4, 5, 10, 100, 10_000, i32::MAX] {
            assert_eq!(policy.days_for(count(n)), 60, "count {n}");
        }
    }

    #[test]
    fn test_interval_for_matches_days() {
        let policy = IntervalPolicy::standard();

        assert_eq!(policy.interval_for(count(1)), TimeDelta::days(7));
        assert_eq!(policy.interval_for(count(42)), TimeDelta::days(60));
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(IntervalPolicy::default(), IntervalPolicy::standard());
    }

    #[test]
    fn test_custom_policy() {
        let policy = IntervalPolicy::new(vec![1, 2], 5).unwrap();

        assert_eq!(policy.days_for(count(0)), 1);
        assert_eq!(policy.days_for(count(1)), 2);
        assert_eq!(policy.days_for(count(2)), 5);
        assert_eq!(policy.table(), &[1, 2]);
        assert_eq!(policy.saturation_days(), 5);
    }

    #[test]
    fn test_empty_table_always_saturates() {
        let policy = IntervalPolicy::new(Vec::new(), 14).unwrap();

        assert_eq!(policy.days_for(count(0)), 14);
        assert_eq!(policy.days_for(count(9)), 14);
    }

    #[test]
    fn test_zero_intervals_rejected() {
        assert_eq!(
            IntervalPolicy::new(vec![3, 0, 15], 60),
            Err(SrsError::InvalidInterval { position: Some(1) })
        );
        assert_eq!(
            IntervalPolicy::new(vec![3, 7], 0),
            Err(SrsError::InvalidInterval { position: None })
        );
    }

    #[test]
    fn test_standard_policy_is_shared() {
        assert!(std::ptr::eq(standard_policy(), standard_policy()));
        assert_eq!(*standard_policy(), IntervalPolicy::standard());
    }
}
