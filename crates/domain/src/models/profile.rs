//! User profile models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's public profile. The id equals the identity provider's user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Creator info for invitation listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreatorInfo {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<&Profile> for CreatorInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            email: Some(profile.email.clone()),
        }
    }
}

/// Response for an email lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserLookupResponse {
    pub exists: bool,
    pub user_id: Option<Uuid>,
}
