use context_gateway::{ChatOutput, ChatRequest, Gateway, GatewayConfig};
use futures_util::StreamExt;
use wiremock::MockServer;

use super::providers::{
    anthropic::AnthropicTestSetup, openai::OpenAITestSetup, sample_context, ProviderTestSetup,
    EXPECTED_TEXT, PROMPT,
};

fn gateway<T: ProviderTestSetup>(mock_server: &MockServer) -> Gateway {
    let config = GatewayConfig::new(vec![T::create_settings(&mock_server.uri())]);
    Gateway::new(config).expect("Failed to create gateway")
}

fn request<T: ProviderTestSetup>(stream: bool) -> ChatRequest {
    ChatRequest::new(PROMPT)
        .model(T::get_config().model)
        .context(sample_context())
        .streaming(stream)
}

/// Send the sample conversation without streaming and return the text.
async fn run_send<T: ProviderTestSetup>() -> String {
    let mock_server = MockServer::start().await;
    T::mount_chat_mocks(&mock_server, false).await;

    match gateway::<T>(&mock_server).chat(request::<T>(false)).await {
        Ok(ChatOutput::Text(text)) => text,
        Ok(ChatOutput::Stream(_)) => panic!("{}: expected a text response", T::get_config().name),
        Err(e) => panic!("{}: chat failed: {e}", T::get_config().name),
    }
}

/// Stream the sample conversation and return every delta in order.
async fn run_stream<T: ProviderTestSetup>() -> Vec<String> {
    let mock_server = MockServer::start().await;
    T::mount_chat_mocks(&mock_server, true).await;

    let response = match gateway::<T>(&mock_server).chat(request::<T>(true)).await {
        Ok(ChatOutput::Stream(response)) => response,
        Ok(ChatOutput::Text(_)) => panic!("{}: expected a streamed response", T::get_config().name),
        Err(e) => panic!("{}: chat failed: {e}", T::get_config().name),
    };

    let mut deltas = Vec::new();
    let mut stream = response.stream();
    while let Some(delta) = stream.next().await {
        deltas.push(delta.expect("Stream should parse correctly").into_string());
    }
    deltas
}

async fn run_equivalence_test<T: ProviderTestSetup>() {
    let config = T::get_config();

    let text = run_send::<T>().await;
    assert_eq!(text, EXPECTED_TEXT, "{}: non-streaming text", config.name);

    let deltas = run_stream::<T>().await;
    assert!(!deltas.is_empty(), "{}: a successful stream yields at least one delta", config.name);
    assert_eq!(deltas.concat(), text, "{}: streamed text should equal sent text", config.name);

    if config.streams_incrementally {
        assert!(deltas.len() > 1, "{}: expected incremental deltas", config.name);
    } else {
        assert_eq!(deltas, vec![EXPECTED_TEXT], "{}: expected a single full delta", config.name);
    }
}

#[tokio::test]
async fn test_openai_stream_send_equivalence() {
    run_equivalence_test::<OpenAITestSetup>().await;
}

#[tokio::test]
async fn test_anthropic_stream_send_equivalence() {
    run_equivalence_test::<AnthropicTestSetup>().await;
}

#[tokio::test]
async fn test_openai_stream_deltas_in_order() {
    let deltas = run_stream::<OpenAITestSetup>().await;
    assert_eq!(deltas, vec!["It", " declares", " x", " and sets it to 1."]);
}
