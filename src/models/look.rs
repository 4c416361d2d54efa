use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::{Mood, Occasion};

/// Violations of the look invariants
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookError {
    #[error("a look needs at least one step")]
    EmptySteps,

    #[error("step area '{0}' appears more than once")]
    DuplicateStepArea(String),

    #[error("{slot} color '{value}' is not a 6-digit hex code")]
    InvalidHexColor { slot: &'static str, value: String },
}

/// A complete makeup recommendation
///
/// Built through [`MakeupLook::new`], which enforces a non-empty step sequence with
/// unique areas. The palette is a fixed five-slot struct, so a partial palette cannot
/// be represented. Two looks are equal when their ids are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupLook {
    id: String,
    look_name: String,
    vibe: String,
    occasion: Occasion,
    mood: Mood,
    color_palette: ColorPalette,
    steps: Vec<MakeupStep>,
    #[serde(default, rename = "imageURL", skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl MakeupLook {
    /// Creates a look with a fresh id and the current timestamp
    pub fn new(
        look_name: impl Into<String>,
        vibe: impl Into<String>,
        occasion: Occasion,
        mood: Mood,
        color_palette: ColorPalette,
        steps: Vec<MakeupStep>,
    ) -> Result<Self, LookError> {
        validate_steps(&steps)?;

        Ok(Self::curated(look_name, vibe, occasion, mood, color_palette, steps))
    }

    /// Creates a look from built-in content whose steps are known to be valid
    pub(crate) fn curated(
        look_name: impl Into<String>,
        vibe: impl Into<String>,
        occasion: Occasion,
        mood: Mood,
        color_palette: ColorPalette,
        steps: Vec<MakeupStep>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            look_name: look_name.into(),
            vibe: vibe.into(),
            occasion,
            mood,
            color_palette,
            steps,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    /// Returns a copy tagged with the given occasion and mood
    pub fn with_context(mut self, occasion: Occasion, mood: Mood) -> Self {
        self.occasion = occasion;
        self.mood = mood;
        self
    }

    /// Returns a copy carrying the given reference image
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn look_name(&self) -> &str {
        &self.look_name
    }

    pub fn vibe(&self) -> &str {
        &self.vibe
    }

    pub fn occasion(&self) -> Occasion {
        self.occasion
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn color_palette(&self) -> &ColorPalette {
        &self.color_palette
    }

    pub fn steps(&self) -> &[MakeupStep] {
        &self.steps
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Re-checks the step invariants, used on looks decoded from outside sources
    pub fn validate(&self) -> Result<(), LookError> {
        validate_steps(&self.steps)
    }
}

impl PartialEq for MakeupLook {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MakeupLook {}

fn validate_steps(steps: &[MakeupStep]) -> Result<(), LookError> {
    if steps.is_empty() {
        return Err(LookError::EmptySteps);
    }

    let mut seen = HashSet::new();
    for step in steps {
        if !seen.insert(step.area.to_lowercase()) {
            return Err(LookError::DuplicateStepArea(step.area.clone()));
        }
    }

    Ok(())
}

/// The five color slots of a look
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorPalette {
    pub eyeshadow: ColorSpec,
    pub eyeliner: ColorSpec,
    pub lips: ColorSpec,
    pub blush: ColorSpec,
    pub brows: ColorSpec,
}

impl ColorPalette {
    /// Slots paired with their names, in display order
    pub fn slots(&self) -> [(&'static str, &ColorSpec); 5] {
        [
            ("eyeshadow", &self.eyeshadow),
            ("eyeliner", &self.eyeliner),
            ("lips", &self.lips),
            ("blush", &self.blush),
            ("brows", &self.brows),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ColorSpec {
    /// Hex digits without a leading `#`
    pub hex_color: String,
    pub name: String,
    /// Finish or technique, e.g. "winged", "matte"
    #[serde(default)]
    pub detail: Option<String>,
}

impl ColorSpec {
    pub fn new(hex_color: &str, name: &str, detail: Option<&str>) -> Self {
        Self {
            hex_color: hex_color.to_string(),
            name: name.to_string(),
            detail: detail.map(str::to_string),
        }
    }

    /// Decodes the hex string into (alpha, red, green, blue)
    ///
    /// Accepts 3, 6 or 8 digits and ignores surrounding symbols such as `#`.
    /// Anything else decodes to opaque black.
    pub fn argb(&self) -> (u8, u8, u8, u8) {
        let digits: String = self
            .hex_color
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        let Ok(value) = u32::from_str_radix(&digits, 16) else {
            return (255, 0, 0, 0);
        };

        match digits.len() {
            3 => (
                255,
                ((value >> 8) & 0xF) as u8 * 17,
                ((value >> 4) & 0xF) as u8 * 17,
                (value & 0xF) as u8 * 17,
            ),
            6 => (
                255,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ),
            8 => (
                (value >> 24) as u8,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ),
            _ => (255, 0, 0, 0),
        }
    }
}

/// One application step; the area doubles as the step's identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MakeupStep {
    pub area: String,
    pub instruction: String,
    #[serde(default)]
    pub tip: Option<String>,
}

impl MakeupStep {
    pub fn new(area: &str, instruction: &str, tip: Option<&str>) -> Self {
        Self {
            area: area.to_string(),
            instruction: instruction.to_string(),
            tip: tip.map(str::to_string),
        }
    }

    pub fn id(&self) -> &str {
        &self.area
    }

    /// Glyph name the UI shows next to the step
    pub fn icon(&self) -> &'static str {
        match self.area.to_lowercase().as_str() {
            "base" | "foundation" => "drop.fill",
            "eyes" | "eyeshadow" => "eye.fill",
            "eyeliner" => "pencil.tip",
            "lips" => "mouth.fill",
            "blush" | "cheeks" => "heart.fill",
            "brows" | "eyebrows" => "eyebrow",
            "highlight" => "sparkles",
            "contour" => "triangle.fill",
            _ => "paintbrush.fill",
        }
    }
}

/// Reference image produced by an image provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImageReference {
    /// Fetchable remote URL
    Url { url: String },
    /// Base64 payload returned inline
    #[serde(rename_all = "camelCase")]
    Inline { mime_type: String, data: String },
}

impl ImageReference {
    /// URL form the UI can render directly (inline payloads become data URLs)
    pub fn to_display_url(&self) -> String {
        match self {
            ImageReference::Url { url } => url.clone(),
            ImageReference::Inline { mime_type, data } => {
                format!("data:{};base64,{}", mime_type, data)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> ColorPalette {
        ColorPalette {
            eyeshadow: ColorSpec::new("C4956A", "Warm Bronze", Some("shimmer")),
            eyeliner: ColorSpec::new("4A3728", "Deep Brown", Some("subtle wing")),
            lips: ColorSpec::new("B85C5C", "Dusty Rose", None),
            blush: ColorSpec::new("E8A090", "Peach Glow", Some("apples")),
            brows: ColorSpec::new("5D4037", "Soft Brown", Some("feathered")),
        }
    }

    fn steps() -> Vec<MakeupStep> {
        vec![
            MakeupStep::new("Base", "Even out skin tone.", Some("Use a damp sponge")),
            MakeupStep::new("Lips", "Apply dusty rose lipstick.", None),
        ]
    }

    #[test]
    fn test_new_look_rejects_empty_steps() {
        let result = MakeupLook::new(
            "Empty",
            "Nothing",
            Occasion::Casual,
            Mood::Fresh,
            palette(),
            vec![],
        );
        assert_eq!(result.unwrap_err(), LookError::EmptySteps);
    }

    #[test]
    fn test_new_look_rejects_duplicate_areas() {
        let mut duplicated = steps();
        duplicated.push(MakeupStep::new("lips", "Again.", None));

        let result = MakeupLook::new(
            "Twice",
            "Repeated",
            Occasion::Casual,
            Mood::Fresh,
            palette(),
            duplicated,
        );
        assert_eq!(
            result.unwrap_err(),
            LookError::DuplicateStepArea("lips".to_string())
        );
    }

    #[test]
    fn test_look_equality_by_id() {
        let a = MakeupLook::new("A", "v", Occasion::Party, Mood::Bold, palette(), steps()).unwrap();
        let b = MakeupLook::new("A", "v", Occasion::Party, Mood::Bold, palette(), steps()).unwrap();
        let a_with_image = a.clone().with_image_url("https://img.test/a.png");

        assert_ne!(a, b);
        assert_eq!(a, a_with_image);
    }

    #[test]
    fn test_look_serde_roundtrip_preserves_fields() {
        let look = MakeupLook::new(
            "Golden Hour Glow",
            "Warm & Radiant",
            Occasion::DateNight,
            Mood::Confident,
            palette(),
            steps(),
        )
        .unwrap();

        let json = serde_json::to_string(&look).unwrap();
        assert!(json.contains("\"lookName\":\"Golden Hour Glow\""));
        assert!(!json.contains("imageURL"));

        let decoded: MakeupLook = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id(), look.id());
        assert_eq!(decoded.look_name(), look.look_name());
        assert_eq!(decoded.vibe(), look.vibe());
        assert_eq!(decoded.occasion(), look.occasion());
        assert_eq!(decoded.mood(), look.mood());
        assert_eq!(decoded.color_palette(), look.color_palette());
        assert_eq!(decoded.steps(), look.steps());
        assert_eq!(decoded.image_url(), None);
        assert_eq!(decoded.created_at(), look.created_at());
        assert_eq!(decoded.color_palette().lips.detail, None);
        assert_eq!(decoded.steps()[1].tip, None);
    }

    #[test]
    fn test_look_roundtrip_with_image() {
        let look = MakeupLook::new("A", "v", Occasion::Event, Mood::Elegant, palette(), steps())
            .unwrap()
            .with_image_url("https://img.test/a.png");

        let json = serde_json::to_string(&look).unwrap();
        let decoded: MakeupLook = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.image_url(), Some("https://img.test/a.png"));
    }

    #[test]
    fn test_color_spec_argb() {
        assert_eq!(ColorSpec::new("FF8000", "x", None).argb(), (255, 255, 128, 0));
        assert_eq!(ColorSpec::new("#F80", "x", None).argb(), (255, 255, 136, 0));
        assert_eq!(
            ColorSpec::new("80112233", "x", None).argb(),
            (128, 17, 34, 51)
        );
        assert_eq!(ColorSpec::new("nothex", "x", None).argb(), (255, 0, 0, 0));
        assert_eq!(ColorSpec::new("12345", "x", None).argb(), (255, 0, 0, 0));
    }

    #[test]
    fn test_step_icon() {
        assert_eq!(MakeupStep::new("Eyeliner", "i", None).icon(), "pencil.tip");
        assert_eq!(MakeupStep::new("Cheeks", "i", None).icon(), "heart.fill");
        assert_eq!(MakeupStep::new("Setting", "i", None).icon(), "paintbrush.fill");
    }

    #[test]
    fn test_image_reference_display_url() {
        let url = ImageReference::Url {
            url: "https://img.test/1.png".to_string(),
        };
        assert_eq!(url.to_display_url(), "https://img.test/1.png");

        let inline = ImageReference::Inline {
            mime_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
        };
        assert_eq!(inline.to_display_url(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_palette_slots_order() {
        let names: Vec<&str> = palette().slots().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["eyeshadow", "eyeliner", "lips", "blush", "brows"]);
    }
}
