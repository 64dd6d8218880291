use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use super::{Provider, error_from_response};

/// Ollama client for interacting with a local Ollama server
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model used by `test_connection`
    model: String,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }
}

impl Ollama {
    /// Create a new Ollama client from a base URL such as `http://localhost:11434`
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        let base_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", endpoint.trim_end_matches('/'))
        };

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Ollama speaks HTTP/1.1
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            model: model.into(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self.client.post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to send request to Ollama API: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_from_response("Ollama", response).await);
        }

        response.json::<GenerationResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama API response: {}", e)))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete(GenerationRequest::new(self.model.clone(), "Hello")).await?;
        Ok(())
    }

    fn extract_text(response: &GenerationResponse) -> Option<String> {
        let text = response.response.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}
