use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::entitlement::PaywallTrigger;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("{}", .0.message())]
    PaywallRequired(PaywallTrigger),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Failures of a remote AI provider call
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("{0} API key not configured")]
    MissingCredential(&'static str),

    #[error("Invalid API URL: {0}")]
    InvalidEndpoint(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP Error {status}: {body}")]
    HttpFailure { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("No image was generated")]
    NoResultProduced,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::PaywallRequired(trigger) = &self {
            let body = Json(json!({
                "error": trigger.message(),
                "title": trigger.title(),
                "trigger": trigger,
            }));
            return (StatusCode::PAYMENT_REQUIRED, body).into_response();
        }

        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Provider(ProviderError::MissingCredential(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::Provider(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Storage(_)
            | AppError::Redis(_)
            | AppError::Io(_)
            | AppError::Internal(_)
            | AppError::PaywallRequired(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_messages() {
        let err = ProviderError::HttpFailure {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP Error 429: rate limited");
        assert_eq!(
            ProviderError::MissingCredential("OpenAI").to_string(),
            "OpenAI API key not configured"
        );
    }

    #[test]
    fn test_status_mapping() {
        let paywall = AppError::PaywallRequired(PaywallTrigger::FreeLimitReached).into_response();
        assert_eq!(paywall.status(), StatusCode::PAYMENT_REQUIRED);

        let missing =
            AppError::Provider(ProviderError::MissingCredential("Gemini")).into_response();
        assert_eq!(missing.status(), StatusCode::SERVICE_UNAVAILABLE);

        let upstream = AppError::Provider(ProviderError::NoResultProduced).into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let not_found = AppError::NotFound("look".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    }
}
