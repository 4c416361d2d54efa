use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FaceShape, Mood, Occasion, SkinTone, StylePreference};

/// The user's stored beauty profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub skin_tone: SkinTone,
    #[serde(default)]
    pub face_shape: Option<FaceShape>,
    pub style_preference: StylePreference,
    /// Ids of looks in the saved-looks collection
    #[serde(default)]
    pub saved_look_ids: Vec<String>,
    #[serde(default)]
    pub has_completed_onboarding: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl UserProfile {
    /// Creates the first-launch profile
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            skin_tone: SkinTone::Medium,
            face_shape: None,
            style_preference: StylePreference::Natural,
            saved_look_ids: Vec::new(),
            has_completed_onboarding: false,
        }
    }
}

/// Input to a single look generation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LookRequest {
    pub skin_tone: SkinTone,
    #[serde(default)]
    pub face_shape: Option<FaceShape>,
    pub style_preference: StylePreference,
    pub occasion: Occasion,
    pub mood: Mood,
}

impl LookRequest {
    /// Combines stored preferences with the occasion and mood picked for this look
    pub fn from_profile(profile: &UserProfile, occasion: Occasion, mood: Mood) -> Self {
        Self {
            skin_tone: profile.skin_tone,
            face_shape: profile.face_shape,
            style_preference: profile.style_preference,
            occasion,
            mood,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new();
        assert_eq!(profile.skin_tone, SkinTone::Medium);
        assert_eq!(profile.face_shape, None);
        assert_eq!(profile.style_preference, StylePreference::Natural);
        assert!(profile.saved_look_ids.is_empty());
        assert!(!profile.has_completed_onboarding);
        assert!(Uuid::parse_str(&profile.id).is_ok());
    }

    #[test]
    fn test_request_from_profile() {
        let profile = UserProfile {
            skin_tone: SkinTone::Tan,
            face_shape: Some(FaceShape::Heart),
            style_preference: StylePreference::Glamorous,
            ..UserProfile::new()
        };

        let request = LookRequest::from_profile(&profile, Occasion::Business, Mood::Confident);
        assert_eq!(request.skin_tone, SkinTone::Tan);
        assert_eq!(request.face_shape, Some(FaceShape::Heart));
        assert_eq!(request.style_preference, StylePreference::Glamorous);
        assert_eq!(request.occasion, Occasion::Business);
        assert_eq!(request.mood, Mood::Confident);
    }

    #[test]
    fn test_profile_serde_roundtrip_without_face_shape() {
        let mut profile = UserProfile::new();
        profile.saved_look_ids = vec!["a".to_string(), "b".to_string()];

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"skinTone\":\"medium\""));

        let decoded: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, profile);
        assert_eq!(decoded.face_shape, None);
    }

    #[test]
    fn test_profile_serde_roundtrip_with_face_shape() {
        let profile = UserProfile {
            face_shape: Some(FaceShape::Oblong),
            has_completed_onboarding: true,
            ..UserProfile::new()
        };

        let json = serde_json::to_string(&profile).unwrap();
        let decoded: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, profile);
    }
}
