//! HTTP implementation of the recommendation service.
//!
//! Talks JSON to the backend's chat endpoint (`POST /api/chat` by default).
//! Every failure, whether transport, non-2xx status, or a body that does not
//! decode, comes back as a `ServiceError`; the caller decides what to show.

use async_trait::async_trait;
use lightnavi_config::AppConfig;
use lightnavi_core::error::ServiceError;
use lightnavi_core::service::{RecommendationService, ServiceRequest, ServiceResponse};
use std::time::Duration;
use tracing::{debug, warn};

/// A recommendation service reached over HTTP.
pub struct HttpRecommendationService {
    name: String,
    base_url: String,
    chat_url: String,
    client: reqwest::Client,
}

impl HttpRecommendationService {
    /// Create a client for the service at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        chat_path: &str,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::NotConfigured(format!("HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let chat_url = format!("{}/{}", base_url, chat_path.trim_start_matches('/'));

        Ok(Self {
            name: "http".into(),
            base_url,
            chat_url,
            client,
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(
            config.service.api_url.clone(),
            &config.service.chat_path,
            Duration::from_secs(config.service.timeout_secs),
        )
    }

    /// The endpoint requests are posted to.
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Pull a readable message out of an error body.
    ///
    /// FastAPI reports errors as `{"detail": "..."}`; anything else is
    /// passed through as text.
    fn error_detail(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn recommend(
        &self,
        request: ServiceRequest,
    ) -> std::result::Result<ServiceResponse, ServiceError> {
        debug!(
            url = %self.chat_url,
            messages = request.messages.len(),
            "Sending recommendation request"
        );

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Service returned error");
            return Err(ServiceError::Status {
                status_code: status.as_u16(),
                message: Self::error_detail(&body),
            });
        }

        let parsed: ServiceResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(candidates = parsed.candidate_count(), "Recommendation received");
        Ok(parsed)
    }

    async fn health_check(&self) -> std::result::Result<bool, ServiceError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_is_joined_once() {
        let service =
            HttpRecommendationService::new("http://localhost:8000/", "/api/chat", Duration::from_secs(5))
                .unwrap();
        assert_eq!(service.chat_url(), "http://localhost:8000/api/chat");
        assert_eq!(service.name(), "http");
    }

    #[test]
    fn from_config_uses_service_section() {
        let mut config = AppConfig::default();
        config.service.api_url = "https://navi.example.com".into();
        config.service.chat_path = "v2/chat".into();
        let service = HttpRecommendationService::from_config(&config).unwrap();
        assert_eq!(service.chat_url(), "https://navi.example.com/v2/chat");
    }

    #[test]
    fn error_detail_prefers_fastapi_detail() {
        assert_eq!(
            HttpRecommendationService::error_detail(r#"{"detail":"エラーが発生しました: boom"}"#),
            "エラーが発生しました: boom"
        );
        assert_eq!(
            HttpRecommendationService::error_detail("Bad Gateway\n"),
            "Bad Gateway"
        );
    }
}
