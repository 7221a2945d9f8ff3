//! Campaign progress math.
//!
//! Pure read-side computation over counted totals; nothing here mutates
//! state, so callers may recompute with arbitrary concurrency. `counted`
//! is the raised amount for monetary campaigns and the received item
//! quantity for non-monetary ones, always summed over terminal-success
//! donations only.

use crate::campaign::ApprovalState;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Percent of target reached, rounded, clamped to `[0, 100]`.
/// A non-positive target yields 0 rather than a division error.
pub fn percent_complete(counted: i64, target: i64) -> i16 {
    if target <= 0 {
        return 0;
    }
    let percent = (counted as f64 / target as f64 * 100.0).round() as i64;
    percent.clamp(0, 100) as i16
}

/// How much is still needed to reach the target, floored at 0.
pub fn remaining_needed(counted: i64, target: i64) -> i64 {
    (target - counted).max(0)
}

/// A campaign is closed once its target is reached or its deadline passes.
/// Closed campaigns still serve their final aggregates; they only stop
/// accepting new donations.
pub fn is_closed(counted: i64, target: i64, deadline: Timestamp, now: Timestamp) -> bool {
    counted >= target || now > deadline
}

/// Check that a campaign can accept a new donation right now.
///
/// Recording requires an `Approved`, still-open campaign; everything else
/// fails with `CampaignClosed` carrying the specific reason.
pub fn ensure_accepting_donations(
    state: ApprovalState,
    counted: i64,
    target: i64,
    deadline: Timestamp,
    now: Timestamp,
) -> Result<(), CoreError> {
    match state {
        ApprovalState::Approved => {}
        ApprovalState::PendingAdminApproval | ApprovalState::PendingPrincipalApproval => {
            return Err(CoreError::CampaignClosed(
                "campaign has not been approved yet".into(),
            ));
        }
        ApprovalState::Rejected => {
            return Err(CoreError::CampaignClosed("campaign was rejected".into()));
        }
    }
    if now > deadline {
        return Err(CoreError::CampaignClosed(
            "campaign deadline has passed".into(),
        ));
    }
    if counted >= target {
        return Err(CoreError::CampaignClosed(
            "campaign target has been reached".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days_ahead(days: i64) -> Timestamp {
        chrono::Utc::now() + chrono::Duration::days(days)
    }

    #[test]
    fn percent_is_rounded_and_clamped() {
        assert_eq!(percent_complete(3_000, 10_000), 30);
        assert_eq!(percent_complete(10_000, 10_000), 100);
        // Over-funded campaigns clamp at 100.
        assert_eq!(percent_complete(15_000, 10_000), 100);
        assert_eq!(percent_complete(125, 1_000), 13);
        assert_eq!(percent_complete(0, 10_000), 0);
    }

    #[test]
    fn percent_of_non_positive_target_is_zero() {
        assert_eq!(percent_complete(500, 0), 0);
        assert_eq!(percent_complete(500, -1), 0);
    }

    #[test]
    fn remaining_floors_at_zero() {
        assert_eq!(remaining_needed(3_000, 10_000), 7_000);
        assert_eq!(remaining_needed(10_000, 10_000), 0);
        assert_eq!(remaining_needed(12_000, 10_000), 0);
    }

    #[test]
    fn closed_when_target_reached_or_deadline_passed() {
        let now = chrono::Utc::now();
        assert!(!is_closed(3_000, 10_000, days_ahead(30), now));
        assert!(is_closed(10_000, 10_000, days_ahead(30), now));
        assert!(is_closed(0, 10_000, now - chrono::Duration::hours(1), now));
    }

    #[test]
    fn pending_campaigns_do_not_accept_donations() {
        let err = ensure_accepting_donations(
            ApprovalState::PendingAdminApproval,
            0,
            10_000,
            days_ahead(30),
            chrono::Utc::now(),
        );
        assert!(matches!(err, Err(CoreError::CampaignClosed(_))));
    }

    #[test]
    fn rejected_campaigns_do_not_accept_donations() {
        let err = ensure_accepting_donations(
            ApprovalState::Rejected,
            0,
            10_000,
            days_ahead(30),
            chrono::Utc::now(),
        );
        assert!(matches!(err, Err(CoreError::CampaignClosed(_))));
    }

    #[test]
    fn approved_open_campaign_accepts_donations() {
        let res = ensure_accepting_donations(
            ApprovalState::Approved,
            3_000,
            10_000,
            days_ahead(30),
            chrono::Utc::now(),
        );
        assert!(res.is_ok());
    }

    #[test]
    fn fully_funded_campaign_is_closed_to_new_donations() {
        let err = ensure_accepting_donations(
            ApprovalState::Approved,
            10_000,
            10_000,
            days_ahead(30),
            chrono::Utc::now(),
        );
        assert!(matches!(err, Err(CoreError::CampaignClosed(msg)) if msg.contains("target")));
    }

    #[test]
    fn expired_campaign_is_closed_to_new_donations() {
        let now = chrono::Utc::now();
        let err = ensure_accepting_donations(
            ApprovalState::Approved,
            0,
            10_000,
            now - chrono::Duration::minutes(1),
            now,
        );
        assert!(matches!(err, Err(CoreError::CampaignClosed(msg)) if msg.contains("deadline")));
    }
}
