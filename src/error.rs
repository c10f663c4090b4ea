use thiserror::Error;

/// Errors that can occur when using the context-gateway library.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Missing credential for provider {provider}: {env_var} not configured")]
    MissingCredential { provider: String, env_var: String },

    #[error("Provider error: {provider}{} - {message}", status_suffix(.status))]
    Provider {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl Error {
    /// A provider failure without an upstream HTTP status (transport, decoding).
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    /// A non-2xx upstream response, carrying the status and body.
    pub fn upstream(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            status: Some(status),
            message: body.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// The upstream HTTP status, if this error came from a provider response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Provider { status, .. } => *status,
            _ => None,
        }
    }
}
