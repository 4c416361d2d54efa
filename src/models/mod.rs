use serde::{Deserialize, Serialize};

pub mod enums;
pub mod look;
pub mod profile;

pub use enums::{FaceShape, Mood, Occasion, SkinTone, StylePreference};
pub use look::{ColorPalette, ColorSpec, ImageReference, LookError, MakeupLook, MakeupStep};
pub use profile::{LookRequest, UserProfile};

// ============================================================================
// Embedded look schema (the JSON object a model is asked to produce)
// ============================================================================

/// Look as described by a text model; every field is required
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookPayload {
    pub look_name: String,
    pub vibe: String,
    pub color_palette: PalettePayload,
    pub steps: Vec<StepPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PalettePayload {
    pub eyeshadow: ColorPayload,
    pub eyeliner: ColorPayload,
    pub lips: ColorPayload,
    pub blush: ColorPayload,
    pub brows: ColorPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPayload {
    pub hex_color: String,
    pub name: String,
    pub detail: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepPayload {
    pub area: String,
    pub instruction: String,
    pub tip: String,
}

impl From<ColorPayload> for ColorSpec {
    fn from(color: ColorPayload) -> Self {
        ColorSpec {
            hex_color: color.hex_color,
            name: color.name,
            detail: Some(color.detail),
        }
    }
}

impl From<StepPayload> for MakeupStep {
    fn from(step: StepPayload) -> Self {
        MakeupStep {
            area: step.area,
            instruction: step.instruction,
            tip: Some(step.tip),
        }
    }
}

impl LookPayload {
    /// Builds a look, taking occasion and mood from the request rather than the model
    pub fn into_look(self, request: &LookRequest) -> Result<MakeupLook, LookError> {
        let palette = ColorPalette {
            eyeshadow: self.color_palette.eyeshadow.into(),
            eyeliner: self.color_palette.eyeliner.into(),
            lips: self.color_palette.lips.into(),
            blush: self.color_palette.blush.into(),
            brows: self.color_palette.brows.into(),
        };

        for (slot, color) in palette.slots() {
            if !is_plain_hex6(&color.hex_color) {
                return Err(LookError::InvalidHexColor {
                    slot,
                    value: color.hex_color.clone(),
                });
            }
        }

        MakeupLook::new(
            self.look_name,
            self.vibe,
            request.occasion,
            request.mood,
            palette,
            self.steps.into_iter().map(MakeupStep::from).collect(),
        )
    }
}

/// Six hex digits with no leading `#`
fn is_plain_hex6(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

// ============================================================================
// OpenAI API Types
// ============================================================================

/// Body of POST /v1/chat/completions
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Body of POST /v1/images/generations
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub quality: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub created: Option<i64>,
    pub data: Vec<GeneratedImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

// ============================================================================
// Gemini API Types
// ============================================================================

/// Body of POST /v1beta/models/{model}:generateContent
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

impl GeminiRequest {
    /// Single-turn request carrying one text part
    pub fn from_prompt(prompt: String, modalities: &[&str]) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: Some(vec![GeminiPart {
                    text: Some(prompt),
                    inline_data: None,
                }]),
            }],
            generation_config: GenerationConfig {
                response_modalities: modalities.iter().map(|m| m.to_string()).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Parts of the first candidate, if any
    pub fn first_parts(&self) -> Option<&[GeminiPart]> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_deref()
    }
}
