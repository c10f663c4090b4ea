//! Stream normalizer: turns a provider's line-framed event stream into content deltas.

use crate::providers::StreamProtocol;
use crate::types::ContentDelta;
use crate::Error;
use futures_util::{Stream, StreamExt};
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Upper bound for a single unterminated line held across chunks.
const MAX_LINE_BYTES: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    Streaming,
    /// The completion sentinel was seen.
    Done,
    /// Input ended or was abandoned without a sentinel.
    Closed,
}

/// Incremental decoder for line-framed event streams.
///
/// Bytes may arrive in arbitrary pieces; an incomplete trailing line is held
/// until the rest of it shows up. Once the sentinel is seen (or the decoder is
/// finished) every further byte is ignored.
#[derive(Debug)]
pub struct FrameDecoder {
    provider: String,
    protocol: StreamProtocol,
    buffer: Vec<u8>,
    state: DecoderState,
}

impl FrameDecoder {
    pub fn new(provider: impl Into<String>, protocol: StreamProtocol) -> Self {
        Self {
            provider: provider.into(),
            protocol,
            buffer: Vec::new(),
            state: DecoderState::Streaming,
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// No further input will be decoded.
    pub fn is_done(&self) -> bool {
        self.state != DecoderState::Streaming
    }

    /// The stream ended on the provider's completion sentinel.
    pub fn saw_sentinel(&self) -> bool {
        self.state == DecoderState::Done
    }

    /// Feed one network chunk, appending the deltas completed by it to `deltas` in order.
    ///
    /// Deltas decoded before an error are still appended.
    pub fn feed(&mut self, chunk: &[u8], deltas: &mut Vec<ContentDelta>) -> Result<(), Error> {
        if self.is_done() {
            return Ok(());
        }

        let mut buffer = std::mem::take(&mut self.buffer);
        // The held-over bytes are known to contain no newline.
        let mut search_from = buffer.len();
        buffer.extend_from_slice(chunk);

        let mut line_start = 0;
        while !self.is_done() {
            let Some(pos) = memchr::memchr(b'\n', &buffer[search_from..]) else {
                break;
            };
            let line_end = search_from + pos;
            self.process_line(&buffer[line_start..line_end], deltas);
            line_start = line_end + 1;
            search_from = line_start;
        }

        if self.is_done() {
            return Ok(());
        }

        buffer.drain(..line_start);
        if buffer.len() > MAX_LINE_BYTES {
            self.state = DecoderState::Closed;
            return Err(Error::provider(
                self.provider.clone(),
                "stream line exceeded maximum size",
            ));
        }
        self.buffer = buffer;

        Ok(())
    }

    /// Signal end of input. A final line without a trailing newline is still decoded.
    pub fn finish(&mut self) -> Vec<ContentDelta> {
        let mut deltas = Vec::new();
        let rest = std::mem::take(&mut self.buffer);
        if !rest.is_empty() {
            self.process_line(&rest, &mut deltas);
        }
        if !self.is_done() {
            self.state = DecoderState::Closed;
        }
        deltas
    }

    /// Stop decoding without flushing the partial line.
    pub fn close(&mut self) {
        self.buffer.clear();
        if !self.is_done() {
            self.state = DecoderState::Closed;
        }
    }

    fn process_line(&mut self, line: &[u8], deltas: &mut Vec<ContentDelta>) {
        if self.is_done() {
            return;
        }

        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let Ok(line) = std::str::from_utf8(line) else {
            tracing::trace!(provider = %self.provider, "skipping non UTF-8 stream line");
            return;
        };
        if line.trim().is_empty() {
            return;
        }

        // Non-frame lines (comments, `event:` fields) carry nothing for us.
        let Some(payload) = line.strip_prefix(self.protocol.prefix) else {
            return;
        };

        if self.protocol.is_sentinel(payload) {
            tracing::debug!(provider = %self.provider, "stream sentinel received");
            self.state = DecoderState::Done;
            return;
        }

        match self.protocol.parse_frame(payload) {
            Ok(Some(text)) => deltas.push(ContentDelta::new(text)),
            Ok(None) => {}
            Err(e) => {
                tracing::trace!(provider = %self.provider, error = %e, "skipping malformed stream frame");
            }
        }
    }
}

/// A stream adapter yielding content deltas from a raw byte stream.
///
/// The underlying byte stream is dropped as soon as the stream completes, so the
/// upstream connection is released without reading the remaining output. A
/// connection that closes before the completion sentinel ends the stream with a
/// provider error after every delta received so far.
pub struct DeltaStream<S> {
    inner: Option<S>,
    decoder: FrameDecoder,
    pending: VecDeque<ContentDelta>,
    failure: Option<Error>,
}

impl<S> DeltaStream<S> {
    pub fn new(stream: S, decoder: FrameDecoder) -> Self {
        Self {
            inner: Some(stream),
            decoder,
            pending: VecDeque::new(),
            failure: None,
        }
    }

    /// The stream ended on the provider's completion sentinel.
    pub fn saw_sentinel(&self) -> bool {
        self.decoder.saw_sentinel()
    }
}

impl<S, E> Stream for DeltaStream<S>
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Unpin,
    E: Display,
{
    type Item = Result<ContentDelta, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(delta) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(delta)));
            }

            let Some(inner) = this.inner.as_mut() else {
                return Poll::Ready(this.failure.take().map(Err));
            };

            match ready!(inner.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => {
                    let mut deltas = Vec::new();
                    let result = this.decoder.feed(&chunk, &mut deltas);
                    this.pending.extend(deltas);
                    if let Err(e) = result {
                        this.failure = Some(e);
                    }
                }
                Some(Err(e)) => {
                    this.inner = None;
                    this.pending.clear();
                    this.decoder.close();
                    return Poll::Ready(Some(Err(Error::provider(
                        this.decoder.provider().to_string(),
                        format!("stream interrupted: {e}"),
                    ))));
                }
                None => {
                    let deltas = this.decoder.finish();
                    this.pending.extend(deltas);
                    if !this.decoder.saw_sentinel() {
                        tracing::warn!(provider = %this.decoder.provider(), "stream closed before completion sentinel");
                        this.failure = Some(Error::provider(
                            this.decoder.provider().to_string(),
                            "stream ended before completion sentinel",
                        ));
                    }
                }
            }

            if this.decoder.is_done() {
                this.inner = None;
            }
        }
    }
}

/// Extension trait to normalize byte streams into content deltas.
pub trait DeltaStreamExt: Stream {
    fn content_deltas(self, provider: impl Into<String>, protocol: StreamProtocol) -> DeltaStream<Self>
    where
        Self: Sized,
    {
        DeltaStream::new(self, FrameDecoder::new(provider, protocol))
    }
}

impl<S: Stream> DeltaStreamExt for S {}
