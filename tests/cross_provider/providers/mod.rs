pub mod anthropic;
pub mod openai;

use context_gateway::{ContextRecord, ProviderSettings};
use wiremock::MockServer;

pub const PROMPT: &str = "Explain this file";
pub const EXPECTED_TEXT: &str = "It declares x and sets it to 1.";

/// The codebase context shared by every cross-provider test.
pub fn sample_context() -> Vec<ContextRecord> {
    vec![ContextRecord::new("a.js", "let x=1;")]
}

/// The system message the gateway should build for [`sample_context`].
pub fn expected_system_message() -> &'static str {
    "You are a helpful assistant. Here is the codebase context:\n\nFile: a.js\nlet x=1;"
}

/// Load test fixture from file
pub fn load_fixture(filename: &str) -> String {
    std::fs::read_to_string(filename)
        .unwrap_or_else(|_| panic!("Failed to load test fixture: {filename}"))
}

/// Provider configuration for cross-provider testing
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: &'static str,
    pub model: &'static str,
    /// Whether the provider's stream is normalized incrementally (vs. one-delta fallback).
    pub streams_incrementally: bool,
}

/// Trait for provider-specific test setup
#[async_trait::async_trait]
pub trait ProviderTestSetup {
    /// Get the provider configuration
    fn get_config() -> ProviderConfig;

    /// Provider settings pointing at the mock server
    fn create_settings(base_url: &str) -> ProviderSettings;

    /// Mount the mocks answering the sample conversation, streamed or not
    async fn mount_chat_mocks(mock_server: &MockServer, stream: bool);
}
