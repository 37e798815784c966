//! Band domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::membership::MembershipRole;

/// Represents a band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Band {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Band {
    pub fn info(&self) -> BandInfo {
        BandInfo {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Band display fields embedded in invitation and membership payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BandInfo {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Values for inserting a band row.
#[derive(Debug, Clone)]
pub struct NewBand {
    pub name: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub created_by: Uuid,
}

/// Band listing entry with the caller's role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BandSummary {
    #[serde(flatten)]
    pub band: Band,
    pub your_role: MembershipRole,
}

/// Request payload for creating a band.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateBandRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Photo URL must be a valid URL"))]
    pub photo_url: Option<String>,
}

/// Response for listing a user's bands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListBandsResponse {
    pub data: Vec<BandSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_band_request_validation() {
        let valid = CreateBandRequest {
            name: "The Wailers".to_string(),
            description: Some("Reggae".to_string()),
            photo_url: None,
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateBandRequest {
            name: String::new(),
            description: None,
            photo_url: None,
        };
        assert!(empty_name.validate().is_err());

        let long_description = CreateBandRequest {
            name: "Band".to_string(),
            description: Some("x".repeat(501)),
            photo_url: None,
        };
        assert!(long_description.validate().is_err());

        let bad_url = CreateBandRequest {
            name: "Band".to_string(),
            description: None,
            photo_url: Some("not a url".to_string()),
        };
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_band_info() {
        let now = Utc::now();
        let band = Band {
            id: Uuid::new_v4(),
            name: "Band".to_string(),
            description: Some("desc".to_string()),
            photo_url: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        let info = band.info();
        assert_eq!(info.id, band.id);
        assert_eq!(info.name, "Band");
        assert_eq!(info.description.as_deref(), Some("desc"));
    }
}
