/// Remote AI providers
///
/// A text provider turns a [`LookRequest`] into a [`MakeupLook`]; an image provider
/// renders a reference portrait for an existing look. OpenAI and Gemini each
/// implement one or both seams, and the look generator picks among them at startup.
use crate::{
    error::ProviderError,
    models::{ImageReference, LookPayload, LookRequest, MakeupLook},
};

pub mod gemini;
pub mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Produces look recommendations from a text model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LookProvider: Send + Sync {
    /// Asks the model for a complete look matching the request
    ///
    /// The returned look always carries the request's occasion and mood,
    /// whatever the model wrote.
    async fn generate_look_recommendation(
        &self,
        request: &LookRequest,
    ) -> Result<MakeupLook, ProviderError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Renders a reference image for a look
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_look_image(&self, look: &MakeupLook)
        -> Result<ImageReference, ProviderError>;

    fn name(&self) -> &'static str;
}

pub const LOOK_SYSTEM_PROMPT: &str =
    "You are an expert makeup artist. Always respond with valid JSON only, no markdown or explanation.";

/// Prompt asking a text model for one look in the embedded JSON schema
pub fn look_prompt(request: &LookRequest) -> String {
    let skin_tone = request.skin_tone.display_name();
    let face_shape = request
        .face_shape
        .map(|shape| shape.as_str())
        .unwrap_or("not specified");

    format!(
        r#"Create a personalized makeup look recommendation.

User Profile:
- Skin Tone: {skin_tone}
- Face Shape: {face_shape}
- Style Preference: {style}
- Occasion: {occasion}
- Mood: {mood}

Generate a complete makeup look that:
1. Complements the user's skin tone
2. Is appropriate for the occasion
3. Reflects the desired mood
4. Matches their style preference

Respond with ONLY a valid JSON object (no markdown, no explanation) in this exact format:
{{
    "lookName": "Creative name for this look",
    "vibe": "2-3 word vibe description",
    "colorPalette": {{
        "eyeshadow": {{"hexColor": "XXXXXX", "name": "Color Name", "detail": "finish/technique"}},
        "eyeliner": {{"hexColor": "XXXXXX", "name": "Color Name", "detail": "style"}},
        "lips": {{"hexColor": "XXXXXX", "name": "Color Name", "detail": "finish"}},
        "blush": {{"hexColor": "XXXXXX", "name": "Color Name", "detail": "placement"}},
        "brows": {{"hexColor": "XXXXXX", "name": "Color Name", "detail": "style"}}
    }},
    "steps": [
        {{"area": "Base", "instruction": "Detailed instruction", "tip": "Pro tip"}},
        {{"area": "Eyes", "instruction": "Detailed instruction", "tip": "Pro tip"}},
        {{"area": "Eyeliner", "instruction": "Detailed instruction", "tip": "Pro tip"}},
        {{"area": "Lips", "instruction": "Detailed instruction", "tip": "Pro tip"}},
        {{"area": "Blush", "instruction": "Detailed instruction", "tip": "Pro tip"}},
        {{"area": "Highlight", "instruction": "Detailed instruction", "tip": "Pro tip"}}
    ]
}}

Important:
- Use 6-character hex codes WITHOUT the # symbol
- Choose colors that complement {skin_tone} skin tones
- Make instructions specific and actionable
- Include 6 steps: Base, Eyes, Eyeliner, Lips, Blush, Highlight"#,
        style = request.style_preference.display_name(),
        occasion = request.occasion.display_name(),
        mood = request.mood.display_name(),
    )
}

/// Detailed editorial portrait prompt
pub fn portrait_prompt(look: &MakeupLook) -> String {
    let palette = look.color_palette();
    let detail = |d: &Option<String>| d.clone().unwrap_or_else(|| "natural".to_string());

    format!(
        "Professional beauty photography portrait of a woman with {vibe} makeup look.\n\n\
         Makeup details:\n\
         - Eyeshadow: {eyeshadow} with {eyeshadow_detail} finish\n\
         - Lips: {lips} {lips_detail} lipstick\n\
         - Blush: {blush} on cheeks\n\
         - Well-defined {brows_detail} brows\n\n\
         Style: High-end beauty editorial, soft studio lighting, clean background, focus on face and makeup.\n\
         The look is perfect for {occasion} occasion.\n\
         Professional makeup application, photorealistic, 4K quality.",
        vibe = look.vibe().to_lowercase(),
        eyeshadow = palette.eyeshadow.name,
        eyeshadow_detail = detail(&palette.eyeshadow.detail),
        lips = palette.lips.name,
        lips_detail = detail(&palette.lips.detail),
        blush = palette.blush.name,
        brows_detail = detail(&palette.brows.detail),
        occasion = look.occasion().display_name(),
    )
}

/// Short portrait prompt for models that take a single instruction line
pub fn compact_portrait_prompt(look: &MakeupLook) -> String {
    let palette = look.color_palette();

    format!(
        "Professional beauty photography portrait of a woman with {name} makeup look.\n\
         Style: {vibe}, perfect for {occasion}.\n\
         Makeup: {eyeshadow} eyeshadow, {lips} lips, {blush} blush.\n\
         High-end beauty editorial, studio lighting, clean background, photorealistic.",
        name = look.look_name(),
        vibe = look.vibe(),
        occasion = look.occasion().display_name(),
        eyeshadow = palette.eyeshadow.name,
        lips = palette.lips.name,
        blush = palette.blush.name,
    )
}

/// Span from the first `{` to the last `}`
///
/// Models sometimes wrap the object in prose or code fences; everything outside
/// the outermost braces is dropped.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Decodes a model's reply into a validated look
pub fn parse_look_payload(text: &str, request: &LookRequest) -> Result<MakeupLook, ProviderError> {
    let span = extract_json_span(text).ok_or_else(|| {
        ProviderError::MalformedResponse("no JSON object in model output".to_string())
    })?;

    let payload: LookPayload = serde_json::from_str(span)
        .map_err(|e| ProviderError::MalformedResponse(format!("look schema mismatch: {}", e)))?;

    payload
        .into_look(request)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}
