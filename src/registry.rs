//! Static provider table and model resolution.

use crate::providers::ProviderKind;
use crate::types::{GatewayConfig, ProviderSettings};
use crate::Error;
use serde::Serialize;
use std::collections::HashSet;

/// A configured LLM provider.
#[derive(Debug, Clone)]
pub struct Provider {
    name: String,
    kind: ProviderKind,
    base_url: String,
    api_key: Option<String>,
    models: Vec<String>,
}

impl Provider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            name: settings.name,
            kind: settings.kind,
            base_url: settings.base_url,
            api_key: settings.api_key.filter(|key| !key.trim().is_empty()),
            models: settings.models,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn supports(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    /// Name of the environment variable expected to hold this provider's credential.
    pub fn credential_env_var(&self) -> String {
        format!("{}_API_KEY", self.name.to_uppercase())
    }

    /// The credential, or `MissingCredential` if none is configured.
    pub fn require_api_key(&self) -> Result<&str, Error> {
        self.api_key().ok_or_else(|| Error::MissingCredential {
            provider: self.name.clone(),
            env_var: self.credential_env_var(),
        })
    }
}

/// Discovery view of a single model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub provider: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Immutable registry of providers, in registration order.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    /// Build the registry from configuration.
    pub fn new(config: &GatewayConfig) -> Self {
        Self::from_providers(config.providers.iter().cloned().map(Provider::new).collect())
    }

    /// Build the registry from an explicit provider list.
    ///
    /// A model declared by more than one provider resolves to the first one.
    pub fn from_providers(providers: Vec<Provider>) -> Self {
        let mut seen = HashSet::new();
        for provider in &providers {
            for model in provider.models() {
                if !seen.insert(model.as_str()) {
                    tracing::warn!(
                        model = %model,
                        provider = %provider.name(),
                        "model already registered by an earlier provider; ignoring this mapping"
                    );
                }
            }
        }
        Self { providers }
    }

    /// Find the provider that owns `model`.
    pub fn resolve(&self, model: &str) -> Result<&Provider, Error> {
        self.providers
            .iter()
            .find(|provider| provider.supports(model))
            .ok_or_else(|| Error::UnsupportedModel(model.to_string()))
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Every declared model, annotated with credential availability. No network I/O.
    pub fn list_models(&self) -> Vec<ModelDescriptor> {
        self.providers
            .iter()
            .flat_map(|provider| {
                let reason = provider
                    .api_key()
                    .is_none()
                    .then(|| format!("{} not configured", provider.credential_env_var()));
                provider.models().iter().map(move |model| ModelDescriptor {
                    id: model.clone(),
                    provider: provider.name().to_string(),
                    available: reason.is_none(),
                    reason: reason.clone(),
                })
            })
            .collect()
    }
}
