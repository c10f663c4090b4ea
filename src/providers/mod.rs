//! Wire formats for the supported LLM provider families.
//!
//! Each family is one variant of [`ProviderKind`]; adding a provider family means
//! adding a variant and its request/response translation here.

pub mod anthropic;
pub mod anthropic_types;
pub mod openai;
pub mod openai_types;

use crate::{Conversation, Error};
use reqwest::RequestBuilder;

/// Generation parameters shared by every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestOptions {
    pub max_tokens: u32,
    pub temperature: f64,
}

/// The closed set of provider wire protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Role-segregated chat completions; the system message stays in the message list.
    ChatCompletions,
    /// Separate top-level `system` field; the message list carries only turns.
    Messages,
}

impl ProviderKind {
    /// Full request URL for this protocol under `base_url`.
    pub fn endpoint(&self, base_url: &str) -> String {
        let base_url = base_url.trim_end_matches('/');
        match self {
            ProviderKind::ChatCompletions => format!("{base_url}/chat/completions"),
            ProviderKind::Messages => format!("{base_url}/messages"),
        }
    }

    /// Serialize the provider-specific request body.
    pub fn build_request(
        &self,
        conversation: &Conversation,
        model: &str,
        options: &RequestOptions,
        stream: bool,
    ) -> Result<serde_json::Value, Error> {
        let body = match self {
            ProviderKind::ChatCompletions => serde_json::to_value(openai::convert_request(
                conversation,
                model,
                options,
                stream,
            ))?,
            ProviderKind::Messages => {
                serde_json::to_value(anthropic::convert_request(conversation, model, options))?
            }
        };
        Ok(body)
    }

    /// Attach credential and protocol headers.
    pub(crate) fn authorize(&self, builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        let builder = builder.header("Content-Type", "application/json");
        match self {
            ProviderKind::ChatCompletions => {
                builder.header("Authorization", format!("Bearer {api_key}"))
            }
            ProviderKind::Messages => builder
                .header("x-api-key", api_key)
                .header("anthropic-version", anthropic::API_VERSION),
        }
    }

    /// Extract the generated text from a non-streaming response body.
    ///
    /// `Ok(None)` means the body parsed but held no output item.
    pub fn parse_response(&self, body: &str) -> Result<Option<String>, serde_json::Error> {
        match self {
            ProviderKind::ChatCompletions => openai::parse_response(body),
            ProviderKind::Messages => anthropic::parse_response(body),
        }
    }

    /// The incremental streaming protocol, when this family's stream is normalized.
    pub fn stream_protocol(&self) -> Option<StreamProtocol> {
        match self {
            ProviderKind::ChatCompletions => Some(StreamProtocol::CHAT_COMPLETIONS),
            ProviderKind::Messages => None,
        }
    }
}

/// How to read one provider's line-framed event stream.
#[derive(Clone, Copy)]
pub struct StreamProtocol {
    /// Prefix marking an event-frame line.
    pub prefix: &'static str,
    /// Payload marking normal end of stream.
    pub sentinel: &'static str,
    parse: fn(&str) -> Result<Option<String>, serde_json::Error>,
}

impl StreamProtocol {
    pub const CHAT_COMPLETIONS: StreamProtocol = StreamProtocol {
        prefix: openai::STREAM_PREFIX,
        sentinel: openai::STREAM_SENTINEL,
        parse: openai::parse_stream_frame,
    };

    /// Parse a frame payload into its text fragment, if it carries one.
    pub fn parse_frame(&self, payload: &str) -> Result<Option<String>, serde_json::Error> {
        (self.parse)(payload)
    }

    pub fn is_sentinel(&self, payload: &str) -> bool {
        payload.trim() == self.sentinel
    }
}

impl std::fmt::Debug for StreamProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamProtocol")
            .field("prefix", &self.prefix)
            .field("sentinel", &self.sentinel)
            .finish_non_exhaustive()
    }
}
