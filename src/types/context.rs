use serde::{Deserialize, Serialize};

/// A file (or document) handed to the gateway as conversational context.
///
/// Content is expected to already be size-bounded by whoever assembled it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRecord {
    pub path: String,
    pub content: String,
}

impl ContextRecord {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Render this record as a labeled block for the system message.
    pub fn render(&self) -> String {
        format!("File: {}\n{}", self.path, self.content)
    }
}
