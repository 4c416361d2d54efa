/// Google Gemini provider
///
/// Both text and images go through `generateContent`; the requested response
/// modalities decide what comes back. Images arrive inline as base64.
use reqwest::Client as HttpClient;
use std::time::Duration;

use crate::{
    error::ProviderError,
    models::{GeminiRequest, GeminiResponse, ImageReference, LookRequest, MakeupLook},
    services::providers::{
        compact_portrait_prompt, look_prompt, parse_look_payload, ImageProvider, LookProvider,
        LOOK_SYSTEM_PROMPT,
    },
};

const TEXT_TIMEOUT: Duration = Duration::from_secs(30);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    text_model: String,
    image_model: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        api_url: &str,
        text_model: String,
        image_model: String,
    ) -> Result<Self, ProviderError> {
        let api_url = api_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&api_url)
            .map_err(|e| ProviderError::InvalidEndpoint(format!("{}: {}", api_url, e)))?;

        Ok(Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            text_model,
            image_model,
        })
    }

    /// Calls generateContent on `model` and decodes the envelope
    async fn generate_content(
        &self,
        model: &str,
        body: &GeminiRequest,
        timeout: Duration,
    ) -> Result<GeminiResponse, ProviderError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.api_url, model);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, model = %model, "Gemini API returned error status");
            return Err(ProviderError::HttpFailure {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(format!("gemini envelope: {}", e)))
    }
}

#[async_trait::async_trait]
impl LookProvider for GeminiProvider {
    async fn generate_look_recommendation(
        &self,
        request: &LookRequest,
    ) -> Result<MakeupLook, ProviderError> {
        let prompt = format!("{}\n\n{}", LOOK_SYSTEM_PROMPT, look_prompt(request));
        let body = GeminiRequest::from_prompt(prompt, &["TEXT"]);

        let response = self
            .generate_content(&self.text_model, &body, TEXT_TIMEOUT)
            .await?;

        let text: String = response
            .first_parts()
            .unwrap_or_default()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "no text part in candidate".to_string(),
            ));
        }

        let look = parse_look_payload(&text, request)?;

        tracing::info!(
            provider = "gemini",
            model = %self.text_model,
            look_name = %look.look_name(),
            "Look generated"
        );

        Ok(look)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[async_trait::async_trait]
impl ImageProvider for GeminiProvider {
    async fn generate_look_image(
        &self,
        look: &MakeupLook,
    ) -> Result<ImageReference, ProviderError> {
        let prompt = format!("Generate an image: {}", compact_portrait_prompt(look));
        let body = GeminiRequest::from_prompt(prompt, &["TEXT", "IMAGE"]);

        let response = self
            .generate_content(&self.image_model, &body, IMAGE_TIMEOUT)
            .await?;

        let inline = response
            .first_parts()
            .ok_or(ProviderError::NoResultProduced)?
            .iter()
            .find_map(|part| part.inline_data.clone())
            .ok_or(ProviderError::NoResultProduced)?;

        tracing::info!(
            provider = "gemini",
            look_id = %look.id(),
            mime_type = %inline.mime_type,
            "Reference image generated"
        );

        Ok(ImageReference::Inline {
            mime_type: inline.mime_type,
            data: inline.data,
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
