//! Messages wire format (Anthropic), where the system prompt is a top-level field.

use super::anthropic_types::{AnthropicMessage, MessagesRequest, MessagesResponse};
use super::RequestOptions;
use crate::Conversation;

pub(crate) const API_VERSION: &str = "2023-06-01";

/// Convert a conversation to a messages request, lifting the system message out.
pub(crate) fn convert_request(
    conversation: &Conversation,
    model: &str,
    options: &RequestOptions,
) -> MessagesRequest {
    let messages = conversation
        .turns()
        .map(|msg| AnthropicMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        })
        .collect();

    MessagesRequest {
        model: model.to_string(),
        max_tokens: options.max_tokens,
        system: conversation.system().map(str::to_string),
        messages,
    }
}

/// Extract the generated text at `content[0].text`.
pub(crate) fn parse_response(body: &str) -> Result<Option<String>, serde_json::Error> {
    let response: MessagesResponse = serde_json::from_str(body)?;
    Ok(response
        .content
        .into_iter()
        .next()
        .map(|block| block.text.unwrap_or_default()))
}
