//! Band membership domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::band::BandInfo;

/// Role within a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Admin,
    Member,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Admin => "admin",
            MembershipRole::Member => "member",
        }
    }

    /// Returns true if this role can create, list and revoke invitations
    pub fn can_manage_invitations(&self) -> bool {
        matches!(self, MembershipRole::Admin)
    }
}

impl FromStr for MembershipRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(MembershipRole::Admin),
            "member" => Ok(MembershipRole::Member),
            _ => Err(format!("Invalid membership role: {}", s)),
        }
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a membership row.
///
/// `Pending` rows are invited but unconfirmed; `Inactive` rows are kept for
/// history after a member leaves or is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Pending,
    Active,
    Inactive,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Active => "active",
            MembershipStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(MembershipStatus::Pending),
            "active" => Ok(MembershipStatus::Active),
            "inactive" => Ok(MembershipStatus::Inactive),
            _ => Err(format!("Invalid membership status: {}", s)),
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user's membership in a band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Membership {
    pub id: Uuid,
    pub band_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub status: MembershipStatus,
    pub invited_by: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }
}

/// Values for inserting a membership row.
#[derive(Debug, Clone)]
pub struct NewMembership {
    pub band_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub status: MembershipStatus,
    pub invited_by: Option<Uuid>,
}

/// Partial update of a membership row; `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipPatch {
    pub status: Option<MembershipStatus>,
    pub role: Option<MembershipRole>,
}

impl MembershipPatch {
    pub fn status(status: MembershipStatus) -> Self {
        Self {
            status: Some(status),
            role: None,
        }
    }
}

/// A pending membership with its band, as shown in the invitee's inbox.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PendingMembership {
    #[serde(flatten)]
    pub membership: Membership,
    pub band: BandInfo,
}

/// Request to invite an existing user to a band by email.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct InviteMemberRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

/// Response for a pending-membership listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListPendingMembershipsResponse {
    pub data: Vec<PendingMembership>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_role_permissions() {
        assert!(MembershipRole::Admin.can_manage_invitations());
        assert!(!MembershipRole::Member.can_manage_invitations());
    }

    #[test]
    fn test_membership_enums_parse() {
        assert_eq!("Admin".parse::<MembershipRole>(), Ok(MembershipRole::Admin));
        assert!("owner".parse::<MembershipRole>().is_err());
        assert_eq!(
            "inactive".parse::<MembershipStatus>(),
            Ok(MembershipStatus::Inactive)
        );
        assert!("accepted".parse::<MembershipStatus>().is_err());
    }

    #[test]
    fn test_membership_status_serialization() {
        let json = serde_json::to_string(&MembershipStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let status: MembershipStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, MembershipStatus::Active);
    }

    #[test]
    fn test_patch_status_only() {
        let patch = MembershipPatch::status(MembershipStatus::Active);
        assert_eq!(patch.status, Some(MembershipStatus::Active));
        assert!(patch.role.is_none());
    }

    #[test]
    fn test_invite_member_request_validation() {
        let ok = InviteMemberRequest {
            email: "drummer@example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = InviteMemberRequest {
            email: "drummer".to_string(),
        };
        assert!(bad.validate().is_err());
    }
}
