//! Request dispatch: provider resolution, HTTP transport and response extraction.

use crate::providers::RequestOptions;
use crate::registry::{Provider, ProviderRegistry};
use crate::sse_stream::DeltaStreamExt;
use crate::{Conversation, Error, Response};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Sends conversations to the provider that owns the requested model.
///
/// Cloning is cheap; the registry and the HTTP connection pool are shared.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    registry: Arc<ProviderRegistry>,
    options: RequestOptions,
}

impl Dispatcher {
    /// Create a dispatcher with its own HTTP client.
    ///
    /// `timeout` bounds connecting and each individual read, not the whole
    /// response, so long-running streams are not cut off.
    pub fn new(
        registry: Arc<ProviderRegistry>,
        options: RequestOptions,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, registry, options))
    }

    /// Create a dispatcher on top of an existing HTTP client.
    pub fn with_client(client: Client, registry: Arc<ProviderRegistry>, options: RequestOptions) -> Self {
        Self {
            client,
            registry,
            options,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Send a conversation and return the complete generated text.
    pub async fn send(&self, conversation: &Conversation, model: &str) -> Result<String, Error> {
        let (provider, api_key) = self.prepare(model)?;
        self.send_to(provider, api_key, conversation, model).await
    }

    /// Open a streamed response.
    ///
    /// Resolution, credential and HTTP status failures are returned here, before
    /// any delta is produced. Providers without normalized incremental streaming
    /// deliver their full text as a single delta.
    pub async fn stream(&self, conversation: &Conversation, model: &str) -> Result<Response, Error> {
        let (provider, api_key) = self.prepare(model)?;

        let Some(protocol) = provider.kind().stream_protocol() else {
            tracing::debug!(
                provider = %provider.name(),
                model,
                "no incremental streaming for provider; delivering full response as one delta"
            );
            let text = self.send_to(provider, api_key, conversation, model).await?;
            return Ok(Response::single(text));
        };

        let response = self.post(provider, api_key, conversation, model, true).await?;
        let deltas = Box::pin(response.bytes_stream()).content_deltas(provider.name(), protocol);

        Ok(Response::from_stream(deltas))
    }

    /// Stream a conversation, invoking `on_delta` for each fragment in arrival order.
    pub async fn stream_with<F>(&self, conversation: &Conversation, model: &str, on_delta: F) -> Result<(), Error>
    where
        F: FnMut(&str),
    {
        self.stream(conversation, model)
            .await?
            .for_each_delta(on_delta)
            .await
    }

    /// Resolve the provider and its credential without any I/O.
    fn prepare(&self, model: &str) -> Result<(&Provider, &str), Error> {
        let provider = self.registry.resolve(model)?;
        let api_key = provider.require_api_key()?;
        Ok((provider, api_key))
    }

    async fn send_to(
        &self,
        provider: &Provider,
        api_key: &str,
        conversation: &Conversation,
        model: &str,
    ) -> Result<String, Error> {
        let response = self.post(provider, api_key, conversation, model, false).await?;
        let body = response.text().await.map_err(|e| {
            Error::provider(provider.name(), format!("failed to read response body: {e}"))
        })?;

        provider
            .kind()
            .parse_response(&body)
            .map_err(|e| Error::provider(provider.name(), format!("invalid response body: {e}")))?
            .ok_or_else(|| Error::provider(provider.name(), "response contained no output"))
    }

    async fn post(
        &self,
        provider: &Provider,
        api_key: &str,
        conversation: &Conversation,
        model: &str,
        stream: bool,
    ) -> Result<reqwest::Response, Error> {
        let kind = provider.kind();
        let body = kind.build_request(conversation, model, &self.options, stream)?;
        let url = kind.endpoint(provider.base_url());

        tracing::debug!(provider = %provider.name(), model, stream, %url, "dispatching chat request");

        let response = kind
            .authorize(self.client.post(&url), api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(provider.name(), format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(provider = %provider.name(), status = status.as_u16(), "provider returned an error");
            return Err(Error::upstream(provider.name(), status.as_u16(), error_text));
        }

        Ok(response)
    }
}
