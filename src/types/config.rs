use crate::providers::ProviderKind;
use crate::Error;
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Static configuration for a single provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub name: String,
    pub kind: ProviderKind,
    pub base_url: String,
    pub api_key: Option<String>,
    pub models: Vec<String>,
}

impl ProviderSettings {
    /// OpenAI chat-completions provider with its default model list.
    pub fn openai(api_key: Option<String>) -> Self {
        Self {
            name: "openai".to_string(),
            kind: ProviderKind::ChatCompletions,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key,
            models: vec!["gpt-4".to_string(), "gpt-3.5-turbo".to_string()],
        }
    }

    /// Anthropic messages provider with its default model list.
    pub fn anthropic(api_key: Option<String>) -> Self {
        Self {
            name: "anthropic".to_string(),
            kind: ProviderKind::Messages,
            base_url: "https://api.anthropic.com/v1".to_string(),
            api_key,
            models: vec![
                "claude-3-5-sonnet-20241022".to_string(),
                "claude-3-5-haiku-20241022".to_string(),
                "claude-3-opus-20240229".to_string(),
            ],
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }
}

/// Resolved gateway configuration. Built once, then handed to the registry.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Providers in registration order; earlier entries win on overlapping models.
    pub providers: Vec<ProviderSettings>,
    pub default_model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            providers: vec![ProviderSettings::openai(None), ProviderSettings::anthropic(None)],
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    pub fn new(providers: Vec<ProviderSettings>) -> Self {
        Self {
            providers,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut openai = ProviderSettings::openai(var("OPENAI_API_KEY"));
        if let Some(base_url) = var("OPENAI_BASE_URL") {
            openai = openai.with_base_url(base_url);
        }

        let mut anthropic = ProviderSettings::anthropic(var("ANTHROPIC_API_KEY"));
        if let Some(base_url) = var("ANTHROPIC_BASE_URL") {
            anthropic = anthropic.with_base_url(base_url);
        }

        let mut config = Self::new(vec![openai, anthropic]);

        if let Some(model) = var("LLM_DEFAULT_MODEL") {
            config.default_model = model;
        }
        if let Some(value) = var("LLM_MAX_TOKENS") {
            config.max_tokens = value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|tokens| *tokens > 0)
                .ok_or_else(|| {
                    Error::config(format!("LLM_MAX_TOKENS must be a positive integer, got '{value}'"))
                })?;
        }
        if let Some(value) = var("LLM_TEMPERATURE") {
            config.temperature = value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|temperature| temperature.is_finite() && *temperature >= 0.0)
                .ok_or_else(|| {
                    Error::config(format!(
                        "LLM_TEMPERATURE must be a non-negative number, got '{value}'"
                    ))
                })?;
        }
        if let Some(value) = var("LLM_REQUEST_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    Error::config(format!(
                        "LLM_REQUEST_TIMEOUT_SECS must be a positive number of seconds, got '{value}'"
                    ))
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
