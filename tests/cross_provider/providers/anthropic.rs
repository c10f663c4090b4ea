use super::{
    expected_system_message, load_fixture, ProviderConfig, ProviderTestSetup, PROMPT,
};
use context_gateway::ProviderSettings;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct AnthropicTestSetup;

#[async_trait::async_trait]
impl ProviderTestSetup for AnthropicTestSetup {
    fn get_config() -> ProviderConfig {
        ProviderConfig {
            name: "Anthropic",
            model: "claude-3-5-sonnet-20241022",
            streams_incrementally: false,
        }
    }

    fn create_settings(base_url: &str) -> ProviderSettings {
        ProviderSettings::anthropic(Some("test-api-key".to_string())).with_base_url(base_url)
    }

    async fn mount_chat_mocks(mock_server: &MockServer, _stream: bool) {
        // Streaming falls back to a plain request, so both modes send the same body.
        let payload = json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 2000,
            "system": expected_system_message(),
            "messages": [
                {"role": "user", "content": PROMPT}
            ]
        });

        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_json(payload))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(load_fixture(
                        "tests/cross_provider/fixtures/anthropic/messages_response.json",
                    ))
                    .insert_header("content-type", "application/json"),
            )
            .expect(1)
            .mount(mock_server)
            .await;
    }
}
