//! Membership reconciliation for invitation acceptance.
//!
//! Decides how accepting an invitation affects the user's membership row in
//! the band. Pure: the invitation service applies the returned change.

use uuid::Uuid;

use crate::models::{Membership, MembershipRole, MembershipStatus};

/// Write to perform on the membership table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// No row yet: insert one.
    Insert {
        role: MembershipRole,
        status: MembershipStatus,
    },
    /// Pending row: confirm it.
    Activate { membership_id: Uuid },
    /// Inactive row: bring it back with the invitation's role.
    Reactivate {
        membership_id: Uuid,
        role: MembershipRole,
    },
    /// Already active: leave untouched.
    Keep,
}

/// Planned change plus the flags reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub change: MembershipChange,
    pub already_member: bool,
    pub is_pending: bool,
}

/// Plan the membership write for a user accepting an invitation that grants
/// `granted`. A brand-new signup joins immediately; an existing account
/// without a row gets a pending row to confirm.
pub fn reconcile(
    existing: Option<&Membership>,
    granted: MembershipRole,
    is_new_signup: bool,
) -> Reconciliation {
    let Some(existing) = existing else {
        let status = if is_new_signup {
            MembershipStatus::Active
        } else {
            MembershipStatus::Pending
        };
        return Reconciliation {
            change: MembershipChange::Insert {
                role: granted,
                status,
            },
            already_member: false,
            is_pending: !is_new_signup,
        };
    };

    match existing.status {
        MembershipStatus::Active => Reconciliation {
            change: MembershipChange::Keep,
            already_member: true,
            is_pending: false,
        },
        MembershipStatus::Pending => Reconciliation {
            change: MembershipChange::Activate {
                membership_id: existing.id,
            },
            already_member: false,
            is_pending: false,
        },
        MembershipStatus::Inactive => Reconciliation {
            change: MembershipChange::Reactivate {
                membership_id: existing.id,
                role: granted,
            },
            already_member: false,
            is_pending: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn membership(status: MembershipStatus) -> Membership {
        Membership {
            id: Uuid::new_v4(),
            band_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: MembershipRole::Member,
            status,
            invited_by: None,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_row_existing_user_gets_pending() {
        let plan = reconcile(None, MembershipRole::Member, false);
        assert_eq!(
            plan.change,
            MembershipChange::Insert {
                role: MembershipRole::Member,
                status: MembershipStatus::Pending
            }
        );
        assert!(!plan.already_member);
        assert!(plan.is_pending);
    }

    #[test]
    fn test_no_row_new_signup_gets_active() {
        let plan = reconcile(None, MembershipRole::Admin, true);
        assert_eq!(
            plan.change,
            MembershipChange::Insert {
                role: MembershipRole::Admin,
                status: MembershipStatus::Active
            }
        );
        assert!(!plan.already_member);
        assert!(!plan.is_pending);
    }

    #[test]
    fn test_active_row_is_kept() {
        for is_new_signup in [false, true] {
            let existing = membership(MembershipStatus::Active);
            let plan = reconcile(Some(&existing), MembershipRole::Admin, is_new_signup);
            assert_eq!(plan.change, MembershipChange::Keep);
            assert!(plan.already_member);
            assert!(!plan.is_pending);
        }
    }

    #[test]
    fn test_pending_row_is_activated() {
        let existing = membership(MembershipStatus::Pending);
        let plan = reconcile(Some(&existing), MembershipRole::Admin, false);
        assert_eq!(
            plan.change,
            MembershipChange::Activate {
                membership_id: existing.id
            }
        );
        assert!(!plan.already_member);
        assert!(!plan.is_pending);
    }

    #[test]
    fn test_inactive_row_is_reactivated_with_new_role() {
        let existing = membership(MembershipStatus::Inactive);
        let plan = reconcile(Some(&existing), MembershipRole::Admin, false);
        assert_eq!(
            plan.change,
            MembershipChange::Reactivate {
                membership_id: existing.id,
                role: MembershipRole::Admin
            }
        );
        assert!(!plan.already_member);
        assert!(!plan.is_pending);
    }
}
