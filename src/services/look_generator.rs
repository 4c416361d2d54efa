//! Look generation orchestrator
//!
//! Tries the configured text provider and falls back to the static table on any
//! failure, so a request always yields a look. Image generation has no fallback
//! and reports its errors to the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::{Config, Credentials, TextProviderKind},
    error::ProviderError,
    models::{ImageReference, LookRequest, MakeupLook},
    services::{
        fallback::fallback_look,
        providers::{GeminiProvider, ImageProvider, LookProvider, OpenAiProvider},
    },
};

/// Why a static look was served
#[derive(Debug)]
pub enum FallbackReason {
    /// No text provider is configured
    Disabled,
    ProviderFailed(ProviderError),
}

/// Where a generated look came from
#[derive(Debug)]
pub enum LookSource {
    Remote { provider: &'static str },
    Fallback { reason: FallbackReason },
}

impl LookSource {
    /// Short label reported to clients
    pub fn label(&self) -> &'static str {
        match self {
            LookSource::Remote { provider } => provider,
            LookSource::Fallback { .. } => "fallback",
        }
    }
}

/// Result of one generation request
#[derive(Debug)]
pub struct Generation {
    pub look: MakeupLook,
    pub source: LookSource,
    pub ticket: u64,
    /// False when a newer generation started before this one finished
    pub is_latest: bool,
}

pub struct LookGenerator {
    text_provider: Option<Arc<dyn LookProvider>>,
    image_provider: Option<Arc<dyn ImageProvider>>,
    fallback_delay: Duration,
    tickets: AtomicU64,
}

impl LookGenerator {
    pub fn new(
        text_provider: Option<Arc<dyn LookProvider>>,
        image_provider: Option<Arc<dyn ImageProvider>>,
        fallback_delay: Duration,
    ) -> Self {
        Self {
            text_provider,
            image_provider,
            fallback_delay,
            tickets: AtomicU64::new(0),
        }
    }

    /// Wires providers for whichever keys resolved
    ///
    /// Text: the preferred provider if its key is present, else the other one.
    /// Images: Gemini, else OpenAI.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self, ProviderError> {
        let openai = credentials
            .openai_api_key
            .clone()
            .map(|key| OpenAiProvider::new(key, &config.openai_api_url, config.openai_model.clone()))
            .transpose()?
            .map(Arc::new);

        let gemini = credentials
            .gemini_api_key
            .clone()
            .map(|key| {
                GeminiProvider::new(
                    key,
                    &config.gemini_api_url,
                    config.gemini_text_model.clone(),
                    config.gemini_image_model.clone(),
                )
            })
            .transpose()?
            .map(Arc::new);

        let as_text_openai = openai.clone().map(|p| p as Arc<dyn LookProvider>);
        let as_text_gemini = gemini.clone().map(|p| p as Arc<dyn LookProvider>);

        let text_provider = match config.text_provider {
            TextProviderKind::OpenAi => as_text_openai.or(as_text_gemini),
            TextProviderKind::Gemini => as_text_gemini.or(as_text_openai),
        };

        let image_provider = gemini
            .map(|p| p as Arc<dyn ImageProvider>)
            .or_else(|| openai.map(|p| p as Arc<dyn ImageProvider>));

        tracing::info!(
            text_provider = text_provider.as_ref().map(|p| p.name()).unwrap_or("none"),
            image_provider = image_provider.as_ref().map(|p| p.name()).unwrap_or("none"),
            "Look generator configured"
        );

        Ok(Self::new(
            text_provider,
            image_provider,
            Duration::from_millis(config.fallback_delay_ms),
        ))
    }

    pub fn ai_enabled(&self) -> bool {
        self.text_provider.is_some()
    }

    pub fn image_enabled(&self) -> bool {
        self.image_provider.is_some()
    }

    /// Produces a look for the request, remote if possible
    pub async fn generate(&self, request: &LookRequest) -> Generation {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;

        let (look, source) = match &self.text_provider {
            Some(provider) => match provider.generate_look_recommendation(request).await {
                Ok(look) => (
                    look.with_context(request.occasion, request.mood),
                    LookSource::Remote {
                        provider: provider.name(),
                    },
                ),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        provider = provider.name(),
                        occasion = %request.occasion,
                        mood = %request.mood,
                        "Remote generation failed, serving static look"
                    );
                    (
                        fallback_look(request),
                        LookSource::Fallback {
                            reason: FallbackReason::ProviderFailed(e),
                        },
                    )
                }
            },
            None => {
                tokio::time::sleep(self.fallback_delay).await;
                tracing::info!(
                    occasion = %request.occasion,
                    mood = %request.mood,
                    "AI generation disabled, serving static look"
                );
                (
                    fallback_look(request),
                    LookSource::Fallback {
                        reason: FallbackReason::Disabled,
                    },
                )
            }
        };

        let is_latest = self.is_latest(ticket);
        if !is_latest {
            tracing::debug!(ticket, "Generation superseded by a newer request");
        }

        Generation {
            look,
            source,
            ticket,
            is_latest,
        }
    }

    /// Produces a look; never fails
    pub async fn generate_look(&self, request: &LookRequest) -> MakeupLook {
        self.generate(request).await.look
    }

    /// Renders a reference image; every failure is reported
    pub async fn generate_look_image(
        &self,
        look: &MakeupLook,
    ) -> Result<ImageReference, ProviderError> {
        let provider = self
            .image_provider
            .as_ref()
            .ok_or(ProviderError::MissingCredential("Image provider"))?;

        provider.generate_look_image(look).await.map_err(|e| {
            tracing::error!(error = %e, provider = provider.name(), look_id = %look.id(), "Image generation failed");
            e
        })
    }

    /// Whether `ticket` belongs to the most recently started generation
    pub fn is_latest(&self, ticket: u64) -> bool {
        self.tickets.load(Ordering::SeqCst) == ticket
    }
}
