//! Types for streaming responses.

use std::fmt;

/// A fragment of generated text, in the order it arrived from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDelta(String);

impl ContentDelta {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
