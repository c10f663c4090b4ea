//! Streamed chat responses.

use crate::{ContentDelta, Error};
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;

pub type DeltaStreamBox = Pin<Box<dyn Stream<Item = Result<ContentDelta, Error>> + Send>>;

/// A lazy, finite, non-restartable sequence of content deltas.
///
/// Dropping the response before it is exhausted closes the upstream connection.
pub struct Response {
    stream: DeltaStreamBox,
}

impl Response {
    /// Create a new response from a stream of deltas.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<ContentDelta, Error>> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }

    /// A response that delivers `text` as exactly one delta.
    pub fn single(text: impl Into<String>) -> Self {
        let delta = ContentDelta::new(text);
        Self::from_stream(stream::iter(std::iter::once(Ok(delta))))
    }

    /// Stream the response deltas.
    pub fn stream(self) -> DeltaStreamBox {
        self.stream
    }

    /// Invoke `on_delta` for every delta in arrival order.
    pub async fn for_each_delta<F>(self, mut on_delta: F) -> Result<(), Error>
    where
        F: FnMut(&str),
    {
        let mut stream = self.stream;
        while let Some(delta) = stream.next().await {
            on_delta(delta?.as_str());
        }
        Ok(())
    }

    /// Buffer the entire response into a single string.
    pub async fn text(self) -> Result<String, Error> {
        let mut text = String::new();
        self.for_each_delta(|delta| text.push_str(delta)).await?;
        Ok(text)
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response").finish_non_exhaustive()
    }
}
