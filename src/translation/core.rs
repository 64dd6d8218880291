/*!
 * Core translation service implementation.
 *
 * This module defines the `Translator` seam the caption pipeline talks to,
 * and `TranslationService`, which implements it on top of the configured
 * provider.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, warn};

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::TranslationError;
use crate::language_utils;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::workers_ai::{WorkersAi, WorkersAiRequest};
use crate::providers::{Provider, render_system_prompt};
use super::cache::{TranslationCache, truncate_text};

// Upper bound on LLM output for a single sentence
const MAX_SENTENCE_TOKENS: u32 = 1024;

/// Translates one string between two languages.
///
/// `Ok(None)` means the backend answered without a translation. Callers fall
/// back to the source text in that case and on error.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_language` to `target_language`
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Option<String>, TranslationError>;
}

/// Configured provider client
#[derive(Debug)]
enum Backend {
    WorkersAi(WorkersAi),
    Ollama(Ollama),
    Anthropic(Anthropic),
}

/// Translation service backed by the provider selected in the config
#[derive(Debug)]
pub struct TranslationService {
    /// Translation settings
    pub config: TranslationConfig,

    backend: Backend,

    cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let endpoint = config.get_endpoint();
        let model = config.get_model();
        let timeout_secs = config.get_timeout_secs();

        let backend = match config.provider {
            TranslationProvider::WorkersAi => {
                let account_id = config.get_account_id();
                if account_id.is_empty() {
                    return Err(anyhow!("Workers AI requires an account id"));
                }
                Backend::WorkersAi(WorkersAi::new(config.get_api_key(), account_id, endpoint, model, timeout_secs))
            },
            TranslationProvider::Ollama => Backend::Ollama(Ollama::new(endpoint, model, timeout_secs)),
            TranslationProvider::Anthropic => {
                Backend::Anthropic(Anthropic::new(config.get_api_key(), endpoint, model, timeout_secs))
            },
        };

        let cache = TranslationCache::new(config.common.cache_enabled);

        Ok(Self { config, backend, cache })
    }

    /// Cache shared by every call on this service
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Check that the provider answers
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        match &self.backend {
            Backend::WorkersAi(client) => client.test_connection().await?,
            Backend::Ollama(client) => client.test_connection().await?,
            Backend::Anthropic(client) => client.test_connection().await?,
        }
        Ok(())
    }

    // LLM prompts read better with language names than codes
    fn system_prompt(&self, source_language: &str, target_language: &str) -> String {
        let source_name = language_utils::get_language_name(source_language)
            .unwrap_or_else(|_| source_language.to_string());
        let target_name = language_utils::get_language_name(target_language)
            .unwrap_or_else(|_| target_language.to_string());

        render_system_prompt(&self.config.common.system_prompt, &source_name, &target_name)
    }

    async fn translate_uncached(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Option<String>, TranslationError> {
        let translated = match &self.backend {
            Backend::WorkersAi(client) => {
                // m2m100 takes 2-letter codes
                let source = language_utils::normalize_to_part1_or_part2t(source_language)
                    .unwrap_or_else(|e| {
                        warn!("{}", e);
                        source_language.to_string()
                    });
                let target = language_utils::normalize_to_part1_or_part2t(target_language)
                    .unwrap_or_else(|e| {
                        warn!("{}", e);
                        target_language.to_string()
                    });

                let response = client.complete(WorkersAiRequest::new(text, source, target)).await?;
                WorkersAi::extract_text(&response)
            },
            Backend::Ollama(client) => {
                let request = GenerationRequest::new(self.config.get_model(), text)
                    .system(self.system_prompt(source_language, target_language))
                    .temperature(self.config.common.temperature);

                let response = client.complete(request).await?;
                Ollama::extract_text(&response)
            },
            Backend::Anthropic(client) => {
                let request = AnthropicRequest::new(self.config.get_model(), MAX_SENTENCE_TOKENS)
                    .system(self.system_prompt(source_language, target_language))
                    .temperature(self.config.common.temperature)
                    .add_message("user", text);

                let response = client.complete(request).await?;
                Anthropic::extract_text(&response)
            },
        };

        Ok(translated)
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Option<String>, TranslationError> {
        if let Some(cached) = self.cache.get(text, source_language, target_language) {
            return Ok(Some(cached));
        }

        debug!("Translating '{}' with {}", truncate_text(text, 40), self.config.provider.display_name());
        let translated = self.translate_uncached(text, source_language, target_language).await?;

        if let Some(translation) = &translated {
            self.cache.store(text, source_language, target_language, translation);
        }

        Ok(translated)
    }
}
