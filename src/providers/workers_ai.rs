use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use super::{Provider, error_from_response};

/// Cloudflare Workers AI client for the hosted m2m100 translation model
#[derive(Debug)]
pub struct WorkersAi {
    /// HTTP client for API requests
    client: Client,
    /// API token for authentication
    api_token: String,
    /// Cloudflare account the model runs under
    account_id: String,
    /// API base URL, e.g. `https://api.cloudflare.com/client/v4`
    endpoint: String,
    /// Model identifier, e.g. `@cf/meta/m2m100-1.2b`
    model: String,
}

/// Translation request body
#[derive(Debug, Clone, Serialize)]
pub struct WorkersAiRequest {
    /// Text to translate
    pub text: String,
    /// Source language code
    pub source_lang: String,
    /// Target language code
    pub target_lang: String,
}

/// Translation result payload
#[derive(Debug, Deserialize)]
pub struct WorkersAiResult {
    /// Translated text, absent when the model produced nothing
    #[serde(default)]
    pub translated_text: Option<String>,
}

/// Envelope returned by the Cloudflare API
#[derive(Debug, Deserialize)]
pub struct WorkersAiResponse {
    /// Model output
    #[serde(default)]
    pub result: Option<WorkersAiResult>,
    /// Whether the call succeeded
    #[serde(default)]
    pub success: bool,
    /// Error objects reported by the API
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl WorkersAiRequest {
    /// Create a new translation request
    pub fn new(text: impl Into<String>, source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

impl WorkersAi {
    /// Create a new Workers AI client
    pub fn new(
        api_token: impl Into<String>,
        account_id: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_token: api_token.into(),
            account_id: account_id.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Full URL of the model run endpoint
    pub fn run_url(&self) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.endpoint.trim_end_matches('/'),
            self.account_id,
            self.model
        )
    }
}

#[async_trait]
impl Provider for WorkersAi {
    type Request = WorkersAiRequest;
    type Response = WorkersAiResponse;

    async fn complete(&self, request: WorkersAiRequest) -> Result<WorkersAiResponse, ProviderError> {
        let response = self.client.post(self.run_url())
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to send request to Workers AI: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_from_response("Workers AI", response).await);
        }

        let parsed = response.json::<WorkersAiResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Workers AI response: {}", e)))?;

        if !parsed.success {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: serde_json::to_string(&parsed.errors).unwrap_or_default(),
            });
        }

        Ok(parsed)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete(WorkersAiRequest::new("Hello.", "en", "es")).await?;
        Ok(())
    }

    fn extract_text(response: &WorkersAiResponse) -> Option<String> {
        response.result.as_ref()
            .and_then(|r| r.translated_text.clone())
    }
}
