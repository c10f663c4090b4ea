//! The chat gateway consumed by an HTTP front door.

use crate::dispatcher::Dispatcher;
use crate::providers::RequestOptions;
use crate::registry::{ModelDescriptor, ProviderRegistry};
use crate::types::{ContextRecord, GatewayConfig};
use crate::{Conversation, Error, Response};
use std::sync::Arc;

/// A single chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub context: Vec<ContextRecord>,
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            context: Vec::new(),
            stream: false,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn context(mut self, context: Vec<ContextRecord>) -> Self {
        self.context = context;
        self
    }

    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Result of [`Gateway::chat`], depending on whether streaming was requested.
#[derive(Debug)]
pub enum ChatOutput {
    Text(String),
    Stream(Response),
}

impl ChatOutput {
    /// The full response text, buffering a stream if necessary.
    pub async fn into_text(self) -> Result<String, Error> {
        match self {
            ChatOutput::Text(text) => Ok(text),
            ChatOutput::Stream(response) => response.text().await,
        }
    }
}

/// Provider-agnostic chat gateway.
#[derive(Debug, Clone)]
pub struct Gateway {
    dispatcher: Dispatcher,
    default_model: String,
}

impl Gateway {
    /// Build a gateway from resolved configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, Error> {
        let registry = Arc::new(ProviderRegistry::new(&config));
        let options = RequestOptions {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };
        let dispatcher = Dispatcher::new(registry, options, config.request_timeout)?;

        tracing::debug!(
            providers = dispatcher.registry().providers().len(),
            default_model = %config.default_model,
            "gateway initialized"
        );

        Ok(Self {
            dispatcher,
            default_model: config.default_model,
        })
    }

    /// Build a gateway from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(GatewayConfig::from_env()?)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Run a chat request, returning either the full text or a delta stream.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatOutput, Error> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let conversation = Conversation::build(&request.prompt, &request.context)?;

        if request.stream {
            Ok(ChatOutput::Stream(self.dispatcher.stream(&conversation, model).await?))
        } else {
            Ok(ChatOutput::Text(self.dispatcher.send(&conversation, model).await?))
        }
    }

    /// All known models and whether their provider has a credential.
    pub fn list_models(&self) -> Vec<ModelDescriptor> {
        self.dispatcher.registry().list_models()
    }
}
