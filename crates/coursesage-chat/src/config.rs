//! Provider configuration and selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{LLMConfigResponse, LLMProvider, ResolvedProvider};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_COHERE_MODEL: &str = "command";

/// Stored provider configuration (llm-config.json), API keys falling back
/// to environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default)]
    pub cohere_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_cohere_model")]
    pub cohere_model: String,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}
fn default_cohere_model() -> String {
    DEFAULT_COHERE_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            cohere_api_key: None,
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            groq_model: default_groq_model(),
            cohere_model: default_cohere_model(),
        }
    }
}

/// Blank keys count as missing.
fn non_blank(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring invalid {}: {}", config_path.display(), e);
                LLMConfig::default()
            }),
            Err(_) => LLMConfig::default(),
        };
        config.with_env_fallback(|name| std::env::var(name).ok())
    }

    /// Fill missing keys from `lookup` (normally the process environment).
    pub fn with_env_fallback(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.openai_api_key =
            non_blank(self.openai_api_key.take()).or_else(|| non_blank(lookup("OPENAI_API_KEY")));
        self.anthropic_api_key = non_blank(self.anthropic_api_key.take())
            .or_else(|| non_blank(lookup("ANTHROPIC_API_KEY")));
        self.groq_api_key =
            non_blank(self.groq_api_key.take()).or_else(|| non_blank(lookup("GROQ_API_KEY")));
        self.cohere_api_key =
            non_blank(self.cohere_api_key.take()).or_else(|| non_blank(lookup("COHERE_API_KEY")));
        self
    }

    fn candidate(&self, provider: LLMProvider) -> Option<ResolvedProvider> {
        let (key, model) = match provider {
            LLMProvider::OpenAI => (&self.openai_api_key, &self.openai_model),
            LLMProvider::Anthropic => (&self.anthropic_api_key, &self.anthropic_model),
            LLMProvider::Groq => (&self.groq_api_key, &self.groq_model),
            LLMProvider::Cohere => (&self.cohere_api_key, &self.cohere_model),
        };
        key.as_ref().map(|k| ResolvedProvider {
            provider,
            model: model.clone(),
            api_key: k.clone(),
        })
    }

    /// Resolve which provider and model to use.
    ///
    /// Auto mode prefers OpenAI, then Anthropic, Groq and Cohere.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        match self.preferred_provider.as_str() {
            "auto" => [
                LLMProvider::OpenAI,
                LLMProvider::Anthropic,
                LLMProvider::Groq,
                LLMProvider::Cohere,
            ]
            .into_iter()
            .find_map(|p| self.candidate(p)),
            "openai" => self.candidate(LLMProvider::OpenAI),
            "anthropic" => self.candidate(LLMProvider::Anthropic),
            "groq" => self.candidate(LLMProvider::Groq),
            "cohere" => self.candidate(LLMProvider::Cohere),
            other => {
                warn!("Unknown preferred provider '{}'", other);
                None
            }
        }
    }

    /// Resolve once and log whether AI features are enabled.
    pub fn resolve_and_report(&self) -> Option<ResolvedProvider> {
        let resolved = self.resolve_provider();
        match &resolved {
            Some(r) => info!("Completion provider configured: {} ({})", r.provider, r.model),
            None => warn!("No completion provider API key found. AI features will be disabled."),
        }
        resolved
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> LLMConfigResponse {
        let resolved = self.resolve_provider();
        LLMConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            openai_configured: self.openai_api_key.is_some(),
            anthropic_configured: self.anthropic_api_key.is_some(),
            groq_configured: self.groq_api_key.is_some(),
            cohere_configured: self.cohere_api_key.is_some(),
            active_provider: resolved.as_ref().map(|r| r.provider.to_string()),
            active_model: resolved.map(|r| r.model),
        }
    }
}
