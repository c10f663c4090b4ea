use super::{
    expected_system_message, load_fixture, ProviderConfig, ProviderTestSetup, PROMPT,
};
use context_gateway::ProviderSettings;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct OpenAITestSetup;

#[async_trait::async_trait]
impl ProviderTestSetup for OpenAITestSetup {
    fn get_config() -> ProviderConfig {
        ProviderConfig {
            name: "OpenAI",
            model: "gpt-3.5-turbo",
            streams_incrementally: true,
        }
    }

    fn create_settings(base_url: &str) -> ProviderSettings {
        ProviderSettings::openai(Some("test-api-key".to_string())).with_base_url(base_url)
    }

    async fn mount_chat_mocks(mock_server: &MockServer, stream: bool) {
        let mut payload = json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "system", "content": expected_system_message()},
                {"role": "user", "content": PROMPT}
            ],
            "max_tokens": 2000,
            "temperature": 0.7
        });

        let template = if stream {
            payload["stream"] = json!(true);
            ResponseTemplate::new(200)
                .set_body_string(load_fixture(
                    "tests/cross_provider/fixtures/openai/chat_stream.sse",
                ))
                .insert_header("content-type", "text/event-stream")
                .insert_header("cache-control", "no-cache")
        } else {
            ResponseTemplate::new(200)
                .set_body_string(load_fixture(
                    "tests/cross_provider/fixtures/openai/chat_response.json",
                ))
                .insert_header("content-type", "application/json")
        };

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_json(payload))
            .respond_with(template)
            .expect(1)
            .mount(mock_server)
            .await;
    }
}
