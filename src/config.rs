use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::services::entitlement::SubscriptionStatus;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where profile, looks and counters are persisted
    #[serde(default)]
    pub storage_backend: StorageBackend,

    /// Directory used by the file backend
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    /// Redis connection URL, used by the redis backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// OpenAI API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    #[serde(default = "default_gemini_text_model")]
    pub gemini_text_model: String,

    #[serde(default = "default_gemini_image_model")]
    pub gemini_image_model: String,

    /// Which provider writes look text when both keys are present
    #[serde(default)]
    pub text_provider: TextProviderKind,

    /// Lifetime generations allowed on the free tier
    #[serde(default = "default_free_limit")]
    pub free_look_limit: u32,

    /// Saved looks allowed on the free tier
    #[serde(default = "default_free_limit")]
    pub free_save_limit: u32,

    /// Artificial delay before serving a static look when AI is disabled
    #[serde(default = "default_fallback_delay_ms")]
    pub fallback_delay_ms: u64,

    /// Entitlement reported by the subscription oracle
    #[serde(default)]
    pub subscription_status: SubscriptionStatus,

    /// Bundled key file consulted after the process environment
    #[serde(default = "default_bundled_config_path")]
    pub bundled_config_path: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextProviderKind {
    #[default]
    OpenAi,
    Gemini,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_storage_path() -> String {
    "./glowguide-data".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_text_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_image_model() -> String {
    "gemini-2.0-flash-exp-image-generation".to_string()
}

fn default_free_limit() -> u32 {
    3
}

fn default_fallback_delay_ms() -> u64 {
    1500
}

fn default_bundled_config_path() -> String {
    "glowguide.env".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage_backend: StorageBackend::default(),
            storage_path: default_storage_path(),
            redis_url: default_redis_url(),
            openai_api_url: default_openai_api_url(),
            openai_model: default_openai_model(),
            gemini_api_url: default_gemini_api_url(),
            gemini_text_model: default_gemini_text_model(),
            gemini_image_model: default_gemini_image_model(),
            text_provider: TextProviderKind::default(),
            free_look_limit: default_free_limit(),
            free_save_limit: default_free_limit(),
            fallback_delay_ms: default_fallback_delay_ms(),
            subscription_status: SubscriptionStatus::default(),
            bundled_config_path: default_bundled_config_path(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Provider API keys after source resolution
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Resolves each key from, in order: a secret embedded at build time,
    /// the process environment, then the bundled key file
    pub fn resolve(bundled_config_path: &str) -> Self {
        let bundled = read_bundled_keys(Path::new(bundled_config_path));

        let openai_api_key = first_non_empty([
            option_env!("GLOWGUIDE_OPENAI_API_KEY").map(str::to_string),
            std::env::var(OPENAI_API_KEY).ok(),
            bundled_value(&bundled, OPENAI_API_KEY),
        ]);

        let gemini_api_key = first_non_empty([
            option_env!("GLOWGUIDE_GEMINI_API_KEY").map(str::to_string),
            std::env::var(GEMINI_API_KEY).ok(),
            bundled_value(&bundled, GEMINI_API_KEY),
        ]);

        tracing::info!(
            openai = openai_api_key.is_some(),
            gemini = gemini_api_key.is_some(),
            "Resolved provider credentials"
        );

        Self {
            openai_api_key,
            gemini_api_key,
        }
    }
}

/// First candidate that is present and not blank
pub fn first_non_empty<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Reads KEY=VALUE pairs without touching the process environment
fn read_bundled_keys(path: &Path) -> Vec<(String, String)> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(_) => return Vec::new(),
    };

    iter.filter_map(|entry| match entry {
        Ok(pair) => Some(pair),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Skipping unreadable bundled config line");
            None
        }
    })
    .collect()
}

fn bundled_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}
