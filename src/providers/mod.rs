/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported backends:
 * - Workers AI: Cloudflare's hosted m2m100 translation model
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response, `None` if it carries none
    fn extract_text(response: &Self::Response) -> Option<String>;
}

/// Turn a non-success HTTP response into a provider error
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let message = response.text().await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::error!("{} API error ({}): {}", provider, status, message);

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        ProviderError::AuthenticationError(message)
    } else {
        ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        }
    }
}

/// Fill the `{source_language}` / `{target_language}` placeholders of a prompt template
pub fn render_system_prompt(template: &str, source_language: &str, target_language: &str) -> String {
    template
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
}

pub mod anthropic;
pub mod ollama;
pub mod workers_ai;
