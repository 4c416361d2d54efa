use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Skin tone selected during onboarding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SkinTone {
    Fair,
    Light,
    Medium,
    Tan,
    Deep,
    Rich,
}

impl SkinTone {
    pub const ALL: [SkinTone; 6] = [
        SkinTone::Fair,
        SkinTone::Light,
        SkinTone::Medium,
        SkinTone::Tan,
        SkinTone::Deep,
        SkinTone::Rich,
    ];

    /// Lowercase identifier used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            SkinTone::Fair => "fair",
            SkinTone::Light => "light",
            SkinTone::Medium => "medium",
            SkinTone::Tan => "tan",
            SkinTone::Deep => "deep",
            SkinTone::Rich => "rich",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SkinTone::Fair => "Fair",
            SkinTone::Light => "Light",
            SkinTone::Medium => "Medium",
            SkinTone::Tan => "Tan",
            SkinTone::Deep => "Deep",
            SkinTone::Rich => "Rich",
        }
    }

    /// Reference swatch shown next to the tone picker
    pub fn swatch_hex(&self) -> &'static str {
        match self {
            SkinTone::Fair => "FFE4C4",
            SkinTone::Light => "DEB887",
            SkinTone::Medium => "C19A6B",
            SkinTone::Tan => "A0785A",
            SkinTone::Deep => "8B5A2B",
            SkinTone::Rich => "5D4037",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FaceShape {
    Oval,
    Round,
    Square,
    Heart,
    Oblong,
}

impl FaceShape {
    pub const ALL: [FaceShape; 5] = [
        FaceShape::Oval,
        FaceShape::Round,
        FaceShape::Square,
        FaceShape::Heart,
        FaceShape::Oblong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceShape::Oval => "oval",
            FaceShape::Round => "round",
            FaceShape::Square => "square",
            FaceShape::Heart => "heart",
            FaceShape::Oblong => "oblong",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum StylePreference {
    Natural,
    Bold,
    Glamorous,
    Minimal,
}

impl StylePreference {
    pub const ALL: [StylePreference; 4] = [
        StylePreference::Natural,
        StylePreference::Bold,
        StylePreference::Glamorous,
        StylePreference::Minimal,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            StylePreference::Natural => "Natural",
            StylePreference::Bold => "Bold",
            StylePreference::Glamorous => "Glamorous",
            StylePreference::Minimal => "Minimal",
        }
    }
}

/// Context the look is meant for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Occasion {
    Business,
    DateNight,
    Event,
    Casual,
    Wedding,
    Party,
}

impl Occasion {
    pub const ALL: [Occasion; 6] = [
        Occasion::Business,
        Occasion::DateNight,
        Occasion::Event,
        Occasion::Casual,
        Occasion::Wedding,
        Occasion::Party,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Occasion::Business => "Business Meeting",
            Occasion::DateNight => "Date Night",
            Occasion::Event => "Special Event",
            Occasion::Casual => "Everyday Casual",
            Occasion::Wedding => "Wedding Guest",
            Occasion::Party => "Night Out",
        }
    }
}

/// Emotional tone the look should convey
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Mood {
    Confident,
    Fresh,
    Mysterious,
    Playful,
    Elegant,
    Bold,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Confident,
        Mood::Fresh,
        Mood::Mysterious,
        Mood::Playful,
        Mood::Elegant,
        Mood::Bold,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Mood::Confident => "Confident",
            Mood::Fresh => "Fresh & Natural",
            Mood::Mysterious => "Mysterious",
            Mood::Playful => "Playful",
            Mood::Elegant => "Elegant",
            Mood::Bold => "Bold",
        }
    }
}

impl Display for Occasion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
