/// OpenAI provider
///
/// Look text comes from the chat completions endpoint; reference images come from
/// DALL-E 3 as a hosted URL.
///
/// API Flow:
/// 1. Look: POST /v1/chat/completions → assistant message holding the look JSON
/// 2. Image: POST /v1/images/generations → `data[0].url`
use reqwest::Client as HttpClient;
use std::time::Duration;

use crate::{
    error::ProviderError,
    models::{
        ChatMessage, ChatRequest, ChatResponse, ImageGenerationRequest, ImageGenerationResponse,
        ImageReference, LookRequest, MakeupLook,
    },
    services::providers::{
        look_prompt, parse_look_payload, portrait_prompt, ImageProvider, LookProvider,
        LOOK_SYSTEM_PROMPT,
    },
};

const CHAT_TIMEOUT: Duration = Duration::from_secs(30);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f64 = 0.7;
const IMAGE_MODEL: &str = "dall-e-3";

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, api_url: &str, model: String) -> Result<Self, ProviderError> {
        let api_url = api_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&api_url)
            .map_err(|e| ProviderError::InvalidEndpoint(format!("{}: {}", api_url, e)))?;

        Ok(Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        })
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, path = %path, "OpenAI API returned error status");
            return Err(ProviderError::HttpFailure {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl LookProvider for OpenAiProvider {
    async fn generate_look_recommendation(
        &self,
        request: &LookRequest,
    ) -> Result<MakeupLook, ProviderError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(LOOK_SYSTEM_PROMPT),
                ChatMessage::user(look_prompt(request)),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let text = self
            .post_json("/v1/chat/completions", &body, CHAT_TIMEOUT)
            .await?;

        let chat: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(format!("chat envelope: {}", e)))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::MalformedResponse("no choices returned".to_string()))?;

        let look = parse_look_payload(&content, request)?;

        tracing::info!(
            provider = "openai",
            model = %self.model,
            look_name = %look.look_name(),
            "Look generated"
        );

        Ok(look)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[async_trait::async_trait]
impl ImageProvider for OpenAiProvider {
    async fn generate_look_image(
        &self,
        look: &MakeupLook,
    ) -> Result<ImageReference, ProviderError> {
        let body = ImageGenerationRequest {
            model: IMAGE_MODEL.to_string(),
            prompt: portrait_prompt(look),
            n: 1,
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        };

        let text = self
            .post_json("/v1/images/generations", &body, IMAGE_TIMEOUT)
            .await?;

        let response: ImageGenerationResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(format!("image envelope: {}", e)))?;

        let url = response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or(ProviderError::NoResultProduced)?;

        tracing::info!(provider = "openai", look_id = %look.id(), "Reference image generated");

        Ok(ImageReference::Url { url })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
