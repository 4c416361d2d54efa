use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{ImageReference, MakeupLook, Mood, Occasion, SkinTone, StylePreference, UserProfile},
    services::{
        entitlement::{EntitlementStatus, PaywallTrigger},
        FallbackReason, LookSource,
    },
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub skin_tone: SkinTone,
    pub style_preference: StylePreference,
}

#[derive(Debug, Deserialize)]
pub struct GenerateLookRequest {
    pub occasion: Occasion,
    pub mood: Mood,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLookResponse {
    pub look: MakeupLook,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub is_latest: bool,
    pub remaining_free_looks: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    /// Look to render; defaults to the current look
    #[serde(default)]
    pub look_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub look_id: String,
    pub image: ImageReference,
    pub display_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub look_id: String,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub ids: Vec<String>,
    pub looks: Vec<MakeupLook>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

pub async fn get_profile(State(state): State<AppState>) -> Json<UserProfile> {
    Json(state.profile.profile().await)
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.profile.update_profile(profile).await?))
}

pub async fn complete_onboarding(
    State(state): State<AppState>,
    Json(request): Json<OnboardingRequest>,
) -> AppResult<Json<UserProfile>> {
    let profile = state
        .profile
        .complete_onboarding(request.skin_tone, request.style_preference)
        .await?;
    Ok(Json(profile))
}

pub async fn reset_onboarding(State(state): State<AppState>) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.profile.reset_onboarding().await?))
}

/// Generates a look for the stored profile
///
/// Refused once the free generations are used up. The generation is counted
/// before it starts, since producing a look cannot fail. Every produced look
/// is added to history; only the newest one becomes current.
pub async fn generate_look(
    State(state): State<AppState>,
    Json(request): Json<GenerateLookRequest>,
) -> AppResult<Json<GenerateLookResponse>> {
    if !state.gate.try_record_generation().await? {
        tracing::info!("Generation refused, free limit reached");
        return Err(AppError::PaywallRequired(PaywallTrigger::FreeLimitReached));
    }

    let look_request = state
        .profile
        .build_request(request.occasion, request.mood)
        .await;
    let generation = state.generator.generate(&look_request).await;

    state.library.add_to_history(generation.look.clone()).await?;

    let is_latest = generation.is_latest
        && state
            .set_current_look(generation.ticket, generation.look.clone())
            .await;

    let fallback_reason = match &generation.source {
        LookSource::Fallback {
            reason: FallbackReason::ProviderFailed(e),
        } => Some(e.to_string()),
        LookSource::Fallback {
            reason: FallbackReason::Disabled,
        } => Some("AI generation disabled".to_string()),
        LookSource::Remote { .. } => None,
    };

    tracing::info!(
        look_id = %generation.look.id(),
        look_name = %generation.look.look_name(),
        source = generation.source.label(),
        is_latest,
        "Look generated"
    );

    Ok(Json(GenerateLookResponse {
        source: generation.source.label(),
        fallback_reason,
        is_latest,
        remaining_free_looks: state.gate.remaining_free_looks().await,
        look: generation.look,
    }))
}

pub async fn get_current_look(State(state): State<AppState>) -> AppResult<Json<MakeupLook>> {
    state
        .current_look
        .read()
        .await
        .as_ref()
        .map(|current| Json(current.look.clone()))
        .ok_or_else(|| AppError::NotFound("No look has been generated yet".to_string()))
}

/// Renders a reference image for a look
pub async fn generate_image(
    State(state): State<AppState>,
    request: Option<Json<ImageRequest>>,
) -> AppResult<Json<ImageResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let current = state.current_look.read().await.clone();

    let look = match request.look_id {
        Some(id) => match current.filter(|c| c.look.id() == id) {
            Some(c) => c.look,
            None => state
                .library
                .find(&id)
                .await
                .ok_or_else(|| AppError::NotFound(format!("Look {} not found", id)))?,
        },
        None => current
            .map(|c| c.look)
            .ok_or_else(|| AppError::NotFound("No look has been generated yet".to_string()))?,
    };

    let image = state.generator.generate_look_image(&look).await?;
    let display_url = image.to_display_url();

    {
        let mut current = state.current_look.write().await;
        if let Some(c) = current.as_mut().filter(|c| c.look.id() == look.id()) {
            c.look = c.look.clone().with_image_url(display_url.clone());
        }
    }

    Ok(Json(ImageResponse {
        look_id: look.id().to_string(),
        image,
        display_url,
    }))
}

pub async fn get_saved_looks(State(state): State<AppState>) -> Json<Vec<MakeupLook>> {
    Json(state.library.saved_looks().await)
}

pub async fn save_look(
    State(state): State<AppState>,
    Json(look): Json<MakeupLook>,
) -> AppResult<(StatusCode, Json<Value>)> {
    look.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let look_id = look.id().to_string();
    let created = state.library.save_look(look).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(json!({
            "lookId": look_id,
            "remainingSavedSlots": state.gate.remaining_saved_slots().await,
        })),
    ))
}

pub async fn remove_saved_look(
    State(state): State<AppState>,
    Path(look_id): Path<String>,
) -> AppResult<StatusCode> {
    if state.library.remove_look(&look_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Saved look {} not found", look_id)))
    }
}

pub async fn get_favorites(State(state): State<AppState>) -> Json<FavoritesResponse> {
    Json(FavoritesResponse {
        ids: state.library.favorite_ids().await,
        looks: state.library.favorites().await,
    })
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(look_id): Path<String>,
) -> AppResult<Json<FavoriteResponse>> {
    let is_favorite = state.library.toggle_favorite(&look_id).await?;
    Ok(Json(FavoriteResponse {
        look_id,
        is_favorite,
    }))
}

pub async fn get_history(State(state): State<AppState>) -> Json<Vec<MakeupLook>> {
    Json(state.library.history().await)
}

pub async fn add_to_history(
    State(state): State<AppState>,
    Json(look): Json<MakeupLook>,
) -> AppResult<StatusCode> {
    look.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    state.library.add_to_history(look).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_history(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.library.clear_history().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_from_history(
    State(state): State<AppState>,
    Path(look_id): Path<String>,
) -> AppResult<StatusCode> {
    if state.library.remove_from_history(&look_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Look {} not in history", look_id)))
    }
}

pub async fn get_entitlements(State(state): State<AppState>) -> Json<EntitlementStatus> {
    Json(state.gate.status().await)
}

/// Zeroes the usage counters
pub async fn reset_usage(State(state): State<AppState>) -> AppResult<Json<EntitlementStatus>> {
    state.gate.reset_usage().await?;
    Ok(Json(state.gate.status().await))
}
