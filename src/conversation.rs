use crate::types::{ContextRecord, Message, Role};
use crate::Error;

const CONTEXT_PREAMBLE: &str = "You are a helpful assistant. Here is the codebase context:\n\n";
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// An ordered, provider-agnostic message sequence for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Build a conversation from a user prompt and optional file context.
    ///
    /// When `context` is non-empty a single system message carrying every record
    /// is placed first. The prompt always becomes exactly one trailing user message.
    pub fn build(prompt: &str, context: &[ContextRecord]) -> Result<Self, Error> {
        if prompt.is_empty() {
            return Err(Error::invalid_input("Message is required"));
        }

        let mut messages = Vec::with_capacity(2);
        if !context.is_empty() {
            messages.push(Message::system(render_context(context)));
        }
        messages.push(Message::user(prompt));

        Ok(Self { messages })
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Content of the system message, if the conversation has one.
    pub fn system(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// Every message except the system one, in order.
    pub fn turns(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }
}

fn render_context(context: &[ContextRecord]) -> String {
    let blocks: Vec<String> = context.iter().map(ContextRecord::render).collect();
    format!("{CONTEXT_PREAMBLE}{}", blocks.join(CONTEXT_SEPARATOR))
}
