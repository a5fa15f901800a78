//! User profile model for the session and the API.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// VIP subscription state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "lowercase")]
pub enum VipStatus {
    #[default]
    None,
    Active,
    Expired,
}

impl VipStatus {
    /// Parse the server's free-form status; anything unrecognised is `None`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" | "vip" | "1" => VipStatus::Active,
            "expired" => VipStatus::Expired,
            _ => VipStatus::None,
        }
    }
}

fn lenient_vip_status<'de, D: Deserializer<'de>>(d: D) -> Result<VipStatus, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.as_deref().map(VipStatus::parse).unwrap_or_default())
}

/// Profile of the signed-in user.
///
/// Field names follow the API so the same JSON can be persisted under
/// `USER_DATA` and read back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Date of birth as entered at sign-up
    #[serde(rename = "dob", default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    /// Storage path or URL of the profile picture
    #[serde(rename = "profile_picture", default)]
    pub profile_picture_ref: Option<String>,
    #[serde(default, deserialize_with = "lenient_vip_status")]
    pub vip_status: VipStatus,
    #[serde(default)]
    pub bio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parses_api_shape() {
        let json = r#"{
            "id": 42,
            "username": "sharpshooter",
            "email": "s@example.com",
            "email_verified_at": null,
            "phone": "+2348000000000",
            "dob": "1990-02-01",
            "nationality": "Nigeria",
            "profile_picture": "profile/42.png",
            "otp": null,
            "is_active": 1,
            "vip_status": "Active",
            "bio": null
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.id, 42);
        assert_eq!(profile.date_of_birth.as_deref(), Some("1990-02-01"));
        assert_eq!(profile.profile_picture_ref.as_deref(), Some("profile/42.png"));
        assert_eq!(profile.vip_status, VipStatus::Active);
        assert_eq!(profile.bio, None);
    }

    #[test]
    fn test_unknown_vip_status_is_none() {
        let json = r#"{"id": 1, "username": "u", "email": "e", "vip_status": "gold"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.vip_status, VipStatus::None);

        let json = r#"{"id": 1, "username": "u", "email": "e", "vip_status": null}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.vip_status, VipStatus::None);
    }
}
