//! Chat with a configured provider, optionally with a file as context.
//!
//! ```bash
//! export OPENAI_API_KEY=your_api_key_here
//! cargo run --example chat -- "Explain this file" src/lib.rs
//! STREAM=1 cargo run --example chat -- "Explain this file" src/lib.rs
//! ```
//!
//! Set `RUST_LOG=context_gateway=debug` to see dispatch logging.

use context_gateway::{ChatOutput, ChatRequest, ContextRecord, Gateway};
use futures_util::StreamExt;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let prompt = args
        .next()
        .unwrap_or_else(|| "What is the capital of France?".to_string());
    let context = args
        .map(|path| {
            let content = std::fs::read_to_string(&path)?;
            Ok(ContextRecord::new(path, content))
        })
        .collect::<Result<Vec<_>, std::io::Error>>()?;

    let gateway = Gateway::from_env()?;

    println!("Models:");
    for model in gateway.list_models() {
        match model.reason {
            Some(reason) => println!("  {} ({}) - unavailable: {reason}", model.id, model.provider),
            None => println!("  {} ({})", model.id, model.provider),
        }
    }

    let model = std::env::var("MODEL").unwrap_or_else(|_| gateway.default_model().to_string());
    let request = ChatRequest::new(prompt)
        .model(model.clone())
        .context(context)
        .streaming(std::env::var("STREAM").is_ok());

    println!("\nAI ({model}):");
    match gateway.chat(request).await? {
        ChatOutput::Text(text) => println!("{text}"),
        ChatOutput::Stream(response) => {
            let mut stream = response.stream();
            while let Some(delta) = stream.next().await {
                print!("{}", delta?);
                std::io::stdout().flush()?;
            }
            println!();
        }
    }

    Ok(())
}
