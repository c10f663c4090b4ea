//! Chat-completions wire format (OpenAI and compatible APIs).

use super::openai_types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
};
use super::RequestOptions;
use crate::Conversation;

pub(crate) const STREAM_PREFIX: &str = "data: ";
pub(crate) const STREAM_SENTINEL: &str = "[DONE]";

/// Convert a conversation to a chat-completions request.
pub(crate) fn convert_request(
    conversation: &Conversation,
    model: &str,
    options: &RequestOptions,
    stream: bool,
) -> ChatCompletionRequest {
    let messages = conversation
        .messages()
        .iter()
        .map(|msg| ChatMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        })
        .collect();

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        stream: stream.then_some(true),
    }
}

/// Extract the generated text at `choices[0].message.content`.
pub(crate) fn parse_response(body: &str) -> Result<Option<String>, serde_json::Error> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;
    Ok(response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default()))
}

/// Extract the text fragment at `choices[0].delta.content`, if any.
pub(crate) fn parse_stream_frame(payload: &str) -> Result<Option<String>, serde_json::Error> {
    let chunk: ChatCompletionChunk = serde_json::from_str(payload)?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContextRecord;
    use serde_json::json;

    fn options() -> RequestOptions {
        RequestOptions {
            max_tokens: 2000,
            temperature: 0.7,
        }
    }

    #[test]
    fn test_request_keeps_system_inline() {
        let context = vec![ContextRecord::new("a.js", "let x=1;")];
        let conversation = Conversation::build("Explain this file", &context).unwrap();

        let request = convert_request(&conversation, "gpt-3.5-turbo", &options(), false);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {
                        "role": "system",
                        "content": "You are a helpful assistant. Here is the codebase context:\n\nFile: a.js\nlet x=1;"
                    },
                    {"role": "user", "content": "Explain this file"}
                ],
                "max_tokens": 2000,
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn test_stream_flag_only_when_streaming() {
        let conversation = Conversation::build("Hi", &[]).unwrap();

        let request = convert_request(&conversation, "gpt-4", &options(), true);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["stream"], json!(true));

        let request = convert_request(&conversation, "gpt-4", &options(), false);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"id":"chatcmpl-1","choices":[{"index":0,"message":{"role":"assistant","content":"It declares x."},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_response(body).unwrap(), Some("It declares x.".to_string()));

        assert_eq!(parse_response(r#"{"choices":[]}"#).unwrap(), None);
        assert!(parse_response("not json").is_err());
    }

    #[test]
    fn test_parse_stream_frame() {
        let frame = r#"{"choices":[{"index":0,"delta":{"content":"Hel"}}]}"#;
        assert_eq!(parse_stream_frame(frame).unwrap(), Some("Hel".to_string()));

        // Role-only and finish frames carry no text.
        let role_frame = r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_stream_frame(role_frame).unwrap(), None);
        let finish_frame = r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_stream_frame(finish_frame).unwrap(), None);
        let empty_content = r#"{"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(parse_stream_frame(empty_content).unwrap(), None);

        assert!(parse_stream_frame("{\"choices\": [").is_err());
    }
}
