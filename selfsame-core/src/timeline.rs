//! Cross-platform timeline assessment
//!
//! Conservative heuristic: secondary-platform existence plus a follower
//! threshold on the primary profile. The threshold is injected policy
//! rather than a hardwired constant.

use crate::report::TimelineConsistency;

/// Tunable policy for timeline assessment
#[derive(Debug, Clone)]
pub struct TimelinePolicy {
    /// Primary-platform follower count required for "consistent"
    pub follower_threshold: u64,
}

impl Default for TimelinePolicy {
    fn default() -> Self {
        Self {
            follower_threshold: 300,
        }
    }
}

/// Assess timeline consistency from secondary presence and follower count
pub fn assess_timeline(
    policy: &TimelinePolicy,
    secondary_exists: bool,
    followers: u64,
) -> TimelineConsistency {
    if secondary_exists && followers > policy.follower_threshold {
        return TimelineConsistency::Consistent;
    }
    if secondary_exists {
        return TimelineConsistency::Partial;
    }
    TimelineConsistency::Insufficient
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_above_threshold() {
        let policy = TimelinePolicy::default();
        assert_eq!(
            assess_timeline(&policy, true, 301),
            TimelineConsistency::Consistent
        );
    }

    #[test]
    fn test_partial_at_or_below_threshold() {
        let policy = TimelinePolicy::default();
        assert_eq!(
            assess_timeline(&policy, true, 300),
            TimelineConsistency::Partial
        );
        assert_eq!(
            assess_timeline(&policy, true, 0),
            TimelineConsistency::Partial
        );
    }

    #[test]
    fn test_insufficient_without_secondary() {
        let policy = TimelinePolicy::default();
        assert_eq!(
            assess_timeline(&policy, false, 100_000),
            TimelineConsistency::Insufficient
        );
    }

    #[test]
    fn test_threshold_is_policy() {
        let policy = TimelinePolicy {
            follower_threshold: 10,
        };
        assert_eq!(
            assess_timeline(&policy, true, 11),
            TimelineConsistency::Consistent
        );
    }
}
