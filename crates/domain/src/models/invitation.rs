//! Invitation domain models for band invitations.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::band::BandInfo;
use super::membership::MembershipRole;
use super::profile::CreatorInfo;
use crate::errors::DomainError;

/// Default usage cap for a new invitation.
pub const DEFAULT_MAX_USES: i32 = 1;

/// Default lifetime of a new invitation, in days.
pub const DEFAULT_EXPIRES_IN_DAYS: i64 = 7;

/// Role granted by an invitation.
///
/// Deliberately distinct from [`MembershipRole`]: invitations speak of
/// owners, memberships of admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationRole {
    Owner,
    Member,
}

impl InvitationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationRole::Owner => "owner",
            InvitationRole::Member => "member",
        }
    }

    /// Membership role a user receives when accepting with this role.
    pub fn membership_role(&self) -> MembershipRole {
        match self {
            InvitationRole::Owner => MembershipRole::Admin,
            InvitationRole::Member => MembershipRole::Member,
        }
    }
}

impl FromStr for InvitationRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(InvitationRole::Owner),
            "member" => Ok(InvitationRole::Member),
            _ => Err(format!("Invalid invitation role: {}", s)),
        }
    }
}

impl fmt::Display for InvitationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of an invitation.
///
/// Only moves forward from `Pending`; `Accepted`, `Expired` and `Revoked`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
    Revoked,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Expired => "expired",
            InvitationStatus::Revoked => "revoked",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "expired" => Ok(InvitationStatus::Expired),
            "revoked" => Ok(InvitationStatus::Revoked),
            _ => Err(format!("Invalid invitation status: {}", s)),
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a token cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    InvalidToken,
    AlreadyUsed,
    Expired,
    Revoked,
}

impl InvalidReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            InvalidReason::InvalidToken => "invalid_token",
            InvalidReason::AlreadyUsed => "already_used",
            InvalidReason::Expired => "expired",
            InvalidReason::Revoked => "revoked",
        }
    }

    /// Human-readable message shown to the recipient.
    pub fn message(&self) -> &'static str {
        match self {
            InvalidReason::InvalidToken => "Invalid invitation token",
            InvalidReason::AlreadyUsed => "This invitation has already been used",
            InvalidReason::Expired => "This invitation has expired",
            InvalidReason::Revoked => "This invitation has been revoked",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Represents a band invitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub band_id: Uuid,
    pub invited_by: Uuid,
    pub token: String,
    pub email: Option<String>,
    pub role: InvitationRole,
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// True when a usage cap is set and has been reached.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.max_uses, Some(max) if self.current_uses >= max)
    }

    /// True when an expiry is set and lies strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at < now)
    }

    /// A general link has no target email and works for anyone holding it.
    pub fn is_general_link(&self) -> bool {
        self.email.is_none()
    }

    /// Runs the usability checks in their fixed order: usage cap, expiry,
    /// then status. The first failing check decides the reason.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), InvalidReason> {
        if self.is_exhausted() {
            return Err(InvalidReason::AlreadyUsed);
        }
        if self.is_expired_at(now) {
            return Err(InvalidReason::Expired);
        }
        match self.status {
            InvitationStatus::Revoked => Err(InvalidReason::Revoked),
            InvitationStatus::Expired => Err(InvalidReason::Expired),
            InvitationStatus::Pending | InvitationStatus::Accepted => Ok(()),
        }
    }

    /// Status after the usage counter moves to `uses`.
    pub fn status_after_uses(&self, uses: i32) -> InvitationStatus {
        match self.max_uses {
            Some(max) if uses >= max && self.status == InvitationStatus::Pending => {
                InvitationStatus::Accepted
            }
            _ => self.status,
        }
    }
}

/// Values for inserting a new invitation row.
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub band_id: Uuid,
    pub invited_by: Uuid,
    pub token: String,
    pub email: Option<String>,
    pub role: InvitationRole,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Options for creating an invitation. `None` caps mean unlimited / never.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInvitationOptions {
    pub max_uses: Option<i32>,
    pub expires_in_days: Option<i64>,
    pub email: Option<String>,
    pub role: InvitationRole,
}

impl Default for CreateInvitationOptions {
    fn default() -> Self {
        Self {
            max_uses: Some(DEFAULT_MAX_USES),
            expires_in_days: Some(DEFAULT_EXPIRES_IN_DAYS),
            email: None,
            role: InvitationRole::Member,
        }
    }
}

impl CreateInvitationOptions {
    /// Absolute expiry for an invitation created at `now`; `None` never
    /// expires. Fails when the lifetime does not fit in a timestamp.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, DomainError> {
        let Some(days) = self.expires_in_days else {
            return Ok(None);
        };
        Duration::try_days(days)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .map(Some)
            .ok_or_else(|| DomainError::Validation("expires_in_days is too large".to_string()))
    }
}

/// Invitation joined with its band's display fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationWithBand {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub band: BandInfo,
}

/// Invitation joined with its creator's profile, for listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationWithCreator {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub creator: Option<CreatorInfo>,
}

/// Outcome of validating a token.
#[derive(Debug, Clone)]
pub enum TokenValidation {
    Valid(InvitationWithBand),
    Invalid(InvalidReason),
}

impl TokenValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenValidation::Valid(_))
    }

    pub fn reason(&self) -> Option<InvalidReason> {
        match self {
            TokenValidation::Valid(_) => None,
            TokenValidation::Invalid(reason) => Some(*reason),
        }
    }

    pub fn invitation(&self) -> Option<&InvitationWithBand> {
        match self {
            TokenValidation::Valid(found) => Some(found),
            TokenValidation::Invalid(_) => None,
        }
    }
}

/// Result of accepting an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptOutcome {
    pub band_id: Uuid,
    pub already_member: bool,
    pub is_pending: bool,
}

/// Created invitation plus its shareable link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationResponse {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub invite_url: String,
}

/// Response for listing a band's invitations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitationsResponse {
    pub data: Vec<InvitationWithCreator>,
}

/// Public result of checking a token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidateInvitationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation: Option<InvitationWithBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<TokenValidation> for ValidateInvitationResponse {
    fn from(validation: TokenValidation) -> Self {
        match validation {
            TokenValidation::Valid(found) => Self {
                valid: true,
                invitation: Some(found),
                reason: None,
                error: None,
            },
            TokenValidation::Invalid(reason) => Self {
                valid: false,
                invitation: None,
                reason: Some(reason),
                error: Some(reason.message().to_string()),
            },
        }
    }
}

/// Request to create a new invitation.
///
/// `max_uses` and `expires_in_days` distinguish an absent field (use the
/// default) from an explicit `null` (unlimited / never expires).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationRequest {
    #[serde(default, deserialize_with = "present")]
    pub max_uses: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present")]
    pub expires_in_days: Option<Option<i64>>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub role: Option<InvitationRole>,
}

impl CreateInvitationRequest {
    pub fn into_options(self) -> CreateInvitationOptions {
        self.into_options_with(CreateInvitationOptions::default())
    }

    /// Fill absent fields from `defaults`.
    pub fn into_options_with(self, defaults: CreateInvitationOptions) -> CreateInvitationOptions {
        CreateInvitationOptions {
            max_uses: self.max_uses.unwrap_or(defaults.max_uses),
            expires_in_days: self.expires_in_days.unwrap_or(defaults.expires_in_days),
            email: self.email,
            role: self.role.unwrap_or(defaults.role),
        }
    }
}

/// Request body for accepting an invitation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptInvitationRequest {
    #[serde(default)]
    pub is_new_signup: bool,
}

/// Marks a field as present, so `null` becomes `Some(None)`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation() -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            band_id: Uuid::new_v4(),
            invited_by: Uuid::new_v4(),
            token: "token".to_string(),
            email: None,
            role: InvitationRole::Member,
            max_uses: Some(1),
            current_uses: 0,
            expires_at: Some(Utc::now() + Duration::days(7)),
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_check_valid() {
        assert_eq!(invitation().check(Utc::now()), Ok(()));
    }

    #[test]
    fn test_check_usage_before_expiry() {
        let mut inv = invitation();
        inv.current_uses = 1;
        inv.expires_at = Some(Utc::now() - Duration::days(1));
        inv.status = InvitationStatus::Revoked;
        assert_eq!(inv.check(Utc::now()), Err(InvalidReason::AlreadyUsed));
    }

    #[test]
    fn test_check_expiry_before_revocation() {
        let mut inv = invitation();
        inv.expires_at = Some(Utc::now() - Duration::seconds(1));
        inv.status = InvitationStatus::Revoked;
        assert_eq!(inv.check(Utc::now()), Err(InvalidReason::Expired));
    }

    #[test]
    fn test_check_revoked() {
        let mut inv = invitation();
        inv.status = InvitationStatus::Revoked;
        assert_eq!(inv.check(Utc::now()), Err(InvalidReason::Revoked));
    }

    #[test]
    fn test_check_expired_status_without_timestamp() {
        let mut inv = invitation();
        inv.expires_at = None;
        inv.status = InvitationStatus::Expired;
        assert_eq!(inv.check(Utc::now()), Err(InvalidReason::Expired));
    }

    #[test]
    fn test_unlimited_never_exhausted() {
        let mut inv = invitation();
        inv.max_uses = None;
        inv.current_uses = 10_000;
        inv.expires_at = None;
        assert!(!inv.is_exhausted());
        assert_eq!(inv.check(Utc::now()), Ok(()));
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let now = Utc::now();
        let mut inv = invitation();
        inv.expires_at = Some(now);
        assert!(!inv.is_expired_at(now));
        assert!(inv.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_status_after_uses() {
        let mut inv = invitation();
        inv.max_uses = Some(3);
        assert_eq!(inv.status_after_uses(2), InvitationStatus::Pending);
        assert_eq!(inv.status_after_uses(3), InvitationStatus::Accepted);

        inv.max_uses = None;
        assert_eq!(inv.status_after_uses(50), InvitationStatus::Pending);

        inv.max_uses = Some(1);
        inv.status = InvitationStatus::Revoked;
        assert_eq!(inv.status_after_uses(1), InvitationStatus::Revoked);
    }

    #[test]
    fn test_invitation_role_to_membership_role() {
        assert_eq!(
            InvitationRole::Owner.membership_role(),
            MembershipRole::Admin
        );
        assert_eq!(
            InvitationRole::Member.membership_role(),
            MembershipRole::Member
        );
    }

    #[test]
    fn test_enum_round_trip_strings() {
        assert_eq!("OWNER".parse::<InvitationRole>(), Ok(InvitationRole::Owner));
        assert!("admin".parse::<InvitationRole>().is_err());
        assert_eq!(
            "revoked".parse::<InvitationStatus>(),
            Ok(InvitationStatus::Revoked)
        );
        assert!(InvitationStatus::Accepted.is_terminal());
        assert!(!InvitationStatus::Pending.is_terminal());
    }

    #[test]
    fn test_invalid_reason_codes() {
        assert_eq!(InvalidReason::AlreadyUsed.code(), "already_used");
        assert_eq!(InvalidReason::InvalidToken.code(), "invalid_token");
        assert_eq!(
            InvalidReason::Revoked.to_string(),
            "This invitation has been revoked"
        );
    }

    #[test]
    fn test_create_request_defaults_when_absent() {
        let req: CreateInvitationRequest = serde_json::from_str("{}").unwrap();
        let opts = req.into_options();
        assert_eq!(opts, CreateInvitationOptions::default());
        assert_eq!(opts.max_uses, Some(1));
        assert_eq!(opts.expires_in_days, Some(7));
    }

    #[test]
    fn test_create_request_explicit_null_means_unlimited() {
        let req: CreateInvitationRequest =
            serde_json::from_str(r#"{"max_uses": null, "expires_in_days": null}"#).unwrap();
        let opts = req.into_options();
        assert_eq!(opts.max_uses, None);
        assert_eq!(opts.expires_in_days, None);
    }

    #[test]
    fn test_create_request_values() {
        let req: CreateInvitationRequest = serde_json::from_str(
            r#"{"max_uses": 5, "expires_in_days": 2, "role": "owner", "email": "a@example.com"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        let opts = req.into_options();
        assert_eq!(opts.max_uses, Some(5));
        assert_eq!(opts.expires_in_days, Some(2));
        assert_eq!(opts.role, InvitationRole::Owner);
        assert_eq!(opts.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn test_create_request_custom_defaults() {
        let defaults = CreateInvitationOptions {
            max_uses: Some(10),
            expires_in_days: Some(30),
            ..Default::default()
        };
        let req: CreateInvitationRequest = serde_json::from_str(r#"{"max_uses": 2}"#).unwrap();
        let opts = req.into_options_with(defaults);
        assert_eq!(opts.max_uses, Some(2));
        assert_eq!(opts.expires_in_days, Some(30));
    }

    #[test]
    fn test_create_request_rejects_bad_email() {
        let req: CreateInvitationRequest =
            serde_json::from_str(r#"{"email": "not-an-email"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_options_expires_at() {
        let now = Utc::now();
        let opts = CreateInvitationOptions::default();
        assert_eq!(
            opts.expires_at(now).unwrap(),
            Some(now + Duration::days(7))
        );

        let never = CreateInvitationOptions {
            expires_in_days: None,
            ..Default::default()
        };
        assert_eq!(never.expires_at(now).unwrap(), None);
    }

    #[test]
    fn test_options_expires_at_overflow() {
        let now = Utc::now();
        for days in [i64::MAX, 100_000_000_000] {
            let opts = CreateInvitationOptions {
                expires_in_days: Some(days),
                ..Default::default()
            };
            assert!(matches!(
                opts.expires_at(now),
                Err(DomainError::Validation(ref m)) if m == "expires_in_days is too large"
            ));
        }
    }

    #[test]
    fn test_validate_response_for_invalid_token() {
        let response: ValidateInvitationResponse =
            TokenValidation::Invalid(InvalidReason::Expired).into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["reason"], "expired");
        assert_eq!(json["error"], "This invitation has expired");
        assert!(json.get("invitation").is_none());
    }

    #[test]
    fn test_invitation_with_band_serializes_flat() {
        let inv = invitation();
        let band_id = inv.band_id;
        let with_band = InvitationWithBand {
            invitation: inv,
            band: BandInfo {
                id: band_id,
                name: "The Band".to_string(),
                description: None,
            },
        };
        let json = serde_json::to_value(&with_band).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["role"], "member");
        assert_eq!(json["band"]["name"], "The Band");
    }
}
