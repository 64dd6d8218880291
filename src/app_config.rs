use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Caption source used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Timeout for downloading the caption track, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Sentence regrouping settings
    #[serde(default)]
    pub consolidation: ConsolidationConfig,

    /// Translation config
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// What happens to an unterminated sentence still pending when the track ends
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrailingPolicy {
    // @policy: Emit it as a final cue
    #[default]
    Flush,
    // @policy: Discard it
    Drop,
}

impl std::fmt::Display for TrailingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flush => write!(f, "flush"),
            Self::Drop => write!(f, "drop"),
        }
    }
}

/// Configuration for sentence consolidation
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ConsolidationConfig {
    /// Handling of trailing unterminated content
    #[serde(default)]
    pub trailing: TrailingPolicy,

    /// Force a cut once this many cue fragments have been folded into one sentence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pending_fragments: Option<usize>,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Cloudflare Workers AI (m2m100)
    #[default]
    #[serde(rename = "workersai")]
    WorkersAi,
    // @provider: Ollama
    Ollama,
    // @provider: Anthropic
    Anthropic,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::WorkersAi => "Workers AI",
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::WorkersAi => "workersai".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "workersai" | "workers-ai" | "cloudflare" => Ok(Self::WorkersAi),
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Account identifier (Workers AI only)
    #[serde(default = "String::new")]
    pub account_id: String,

    // @field: Max concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::WorkersAi => Self {
                provider_type: provider_type.to_lowercase_string(),
                model: default_workers_ai_model(),
                api_key: String::new(),
                endpoint: default_workers_ai_endpoint(),
                account_id: String::new(),
                concurrent_requests: default_workers_ai_concurrent_requests(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: provider_type.to_lowercase_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                account_id: String::new(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_ollama_timeout_secs(),
            },
            TranslationProvider::Anthropic => Self {
                provider_type: provider_type.to_lowercase_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                account_id: String::new(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_anthropic_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for LLM providers
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Temperature parameter for LLM providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Reuse translations of identical sentences within a run
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            cache_enabled: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_workers_ai_concurrent_requests() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_fetch_timeout_secs() -> u64 {
    crate::source::DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_anthropic_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_workers_ai_endpoint() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_workers_ai_model() -> String {
    "@cf/meta/m2m100-1.2b".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional subtitle translator. Translate the following sentence from {source_language} to {target_language}. Reply with the translation only, without quotes or commentary.".to_string()
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the language pair and consolidation settings
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.fetch_timeout_secs == 0 {
            return Err(anyhow!("fetch_timeout_secs must be at least 1"));
        }

        if self.consolidation.max_pending_fragments == Some(0) {
            return Err(anyhow!("max_pending_fragments must be at least 1"));
        }

        Ok(())
    }

    /// Validate the settings needed to actually call the translation provider
    pub fn validate_translation(&self) -> Result<()> {
        if self.translation.optimal_concurrent_requests() == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }

        match self.translation.provider {
            TranslationProvider::WorkersAi => {
                if self.translation.get_api_key().is_empty() {
                    return Err(anyhow!("Translation API key is required for Workers AI provider"));
                }
                if self.translation.get_account_id().is_empty() {
                    return Err(anyhow!("Cloudflare account id is required for Workers AI provider"));
                }
            },
            TranslationProvider::Anthropic => {
                if self.translation.get_api_key().is_empty() {
                    return Err(anyhow!("Translation API key is required for Anthropic provider"));
                }
            },
            TranslationProvider::Ollama => {}
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "es".to_string(),
            source_url: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            consolidation: ConsolidationConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    pub fn optimal_concurrent_requests(&self) -> usize {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.concurrent_requests;
        }

        match self.provider {
            TranslationProvider::WorkersAi => default_workers_ai_concurrent_requests(),
            _ => default_concurrent_requests(),
        }
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, inserting defaults if missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(position) => position,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[position]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::WorkersAi => default_workers_ai_model(),
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the account id for the active provider
    pub fn get_account_id(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.account_id.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::WorkersAi => default_workers_ai_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        default_timeout_secs()
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::WorkersAi),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Anthropic),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
