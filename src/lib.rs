//! A provider-agnostic LLM chat gateway.
//!
//! This library sends a prompt, optionally augmented with codebase context, to an
//! OpenAI-style chat-completions provider or an Anthropic-style messages provider,
//! and returns either the complete text or a normalized stream of content deltas.

pub mod conversation;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod registry;
pub mod response;
pub mod sse_stream;
pub mod types;

// Re-export core types for easy usage
pub use conversation::Conversation;
pub use dispatcher::Dispatcher;
pub use error::Error;
pub use gateway::{ChatOutput, ChatRequest, Gateway};
pub use providers::{ProviderKind, RequestOptions, StreamProtocol};
pub use registry::{ModelDescriptor, Provider, ProviderRegistry};
pub use response::Response;
pub use sse_stream::{DeltaStream, DeltaStreamExt, FrameDecoder};
pub use types::*;
