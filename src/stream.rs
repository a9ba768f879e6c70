//! SSE normalization: provider byte streams in, ordered [`TextFragment`]s out.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tracing::{debug, warn};

use crate::error::LLMError;
use crate::http::HttpBodyStream;
use crate::provider::DynProviderAdapter;
use crate::types::TextFragment;

const DATA_PREFIX: &[u8] = b"data: ";

/// Longest line accepted before the stream is considered unreadable.
pub const DEFAULT_MAX_LINE_LEN: usize = 1 << 20;

/// Lazily turns an SSE body into text fragments using a [`crate::ProviderAdapter`].
///
/// Nothing is read until the stream is polled, and at most one line is buffered
/// ahead of the consumer. Lines not starting with `data: ` are dropped. A payload
/// the adapter cannot decode is logged and skipped; a body read failure ends the
/// stream with [`LLMError::Stream`].
///
/// The body is released as soon as the stream reaches a terminal state (end of
/// input, terminal event or error). Dropping a `FragmentStream` early releases it
/// as well; ownership guarantees it is released exactly once.
pub struct FragmentStream {
    body: Option<HttpBodyStream>,
    adapter: DynProviderAdapter,
    buffer: Vec<u8>,
    /// Start of the bytes not yet handed out as lines.
    consumed: usize,
    /// Prefix of `buffer` already known to contain no unconsumed line feed.
    scanned: usize,
    max_line_len: usize,
    finished: bool,
    yielded: usize,
    skipped: usize,
}

enum Step {
    Continue,
    Yield(TextFragment),
    Terminal(Option<TextFragment>),
    Fail(LLMError),
}

impl FragmentStream {
    pub fn new(body: HttpBodyStream, adapter: DynProviderAdapter) -> Self {
        Self {
            body: Some(body),
            adapter,
            buffer: Vec::new(),
            consumed: 0,
            scanned: 0,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            finished: false,
            yielded: 0,
            skipped: 0,
        }
    }

    /// Caps the bytes buffered for a single line.
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len.max(1);
        self
    }

    /// Returns `true` once the body has been released.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn next_line(&mut self) -> Option<Vec<u8>> {
        let offset = self.buffer[self.scanned..]
            .iter()
            .position(|b| *b == b'\n');
        match offset {
            Some(offset) => {
                let pos = self.scanned + offset;
                let line = &self.buffer[self.consumed..pos];
                let line = line.strip_suffix(b"\r").unwrap_or(line).to_vec();
                self.consumed = pos + 1;
                self.scanned = self.consumed;
                Some(line)
            }
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }

    /// Bytes buffered for the line currently being assembled.
    fn pending_len(&self) -> usize {
        self.buffer.len() - self.consumed
    }

    /// Drops consumed lines from the front in a single shift.
    fn compact(&mut self) {
        if self.consumed > 0 {
            self.buffer.drain(..self.consumed);
            self.scanned -= self.consumed;
            self.consumed = 0;
        }
    }

    fn handle_line(&mut self, line: &[u8]) -> Step {
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return Step::Continue;
        };
        let provider = self.adapter.name();
        let payload = match std::str::from_utf8(payload) {
            Ok(payload) => payload,
            Err(err) => {
                return Step::Fail(LLMError::decode(
                    provider,
                    format!("invalid UTF-8 in stream line: {err}"),
                ));
            }
        };

        match self.adapter.decode_stream_event(payload) {
            Ok(event) => {
                let fragment = event.fragment.filter(|fragment| !fragment.is_empty());
                if event.is_terminal {
                    Step::Terminal(fragment)
                } else {
                    fragment.map_or(Step::Continue, Step::Yield)
                }
            }
            Err(LLMError::Decode { message, .. }) => {
                self.skipped += 1;
                warn!(
                    provider,
                    error = %message,
                    payload = preview(payload),
                    "skipping undecodable stream event"
                );
                Step::Continue
            }
            Err(err) => Step::Fail(err),
        }
    }

    fn finish(&mut self, reason: &'static str) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.body = None;
        self.buffer = Vec::new();
        self.consumed = 0;
        self.scanned = 0;
        debug!(
            provider = self.adapter.name(),
            fragments = self.yielded,
            skipped = self.skipped,
            reason,
            "stream finished"
        );
    }

    fn apply(&mut self, step: Step) -> Option<Poll<Option<Result<TextFragment, LLMError>>>> {
        match step {
            Step::Continue => None,
            Step::Yield(fragment) => {
                self.yielded += 1;
                Some(Poll::Ready(Some(Ok(fragment))))
            }
            Step::Terminal(fragment) => {
                self.finish("terminal event");
                Some(Poll::Ready(fragment.map(|fragment| {
                    self.yielded += 1;
                    Ok(fragment)
                })))
            }
            Step::Fail(err) => {
                self.finish("error");
                Some(Poll::Ready(Some(Err(err))))
            }
        }
    }
}

impl Stream for FragmentStream {
    type Item = Result<TextFragment, LLMError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.finished {
                return Poll::Ready(None);
            }

            if let Some(line) = this.next_line() {
                let step = this.handle_line(&line);
                if let Some(ready) = this.apply(step) {
                    return ready;
                }
                continue;
            }

            if this.pending_len() > this.max_line_len {
                let err = LLMError::decode(
                    this.adapter.name(),
                    format!("stream line exceeds {} bytes", this.max_line_len),
                );
                this.finish("error");
                return Poll::Ready(Some(Err(err)));
            }

            let Some(body) = this.body.as_mut() else {
                // End of input: a trailing line without a line feed still counts.
                let mut rest = std::mem::take(&mut this.buffer);
                rest.drain(..this.consumed);
                this.consumed = 0;
                this.scanned = 0;
                let step = if rest.is_empty() {
                    Step::Continue
                } else {
                    let line = rest.strip_suffix(b"\r").unwrap_or(rest.as_slice());
                    this.handle_line(line)
                };
                if let Some(ready) = this.apply(step) {
                    return ready;
                }
                this.finish("end of input");
                return Poll::Ready(None);
            };

            let polled = body.as_mut().poll_next(cx);
            match polled {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.compact();
                    this.buffer.extend_from_slice(&bytes);
                }
                Poll::Ready(Some(Err(err))) => {
                    this.finish("error");
                    return Poll::Ready(Some(Err(LLMError::stream(err.to_string()))));
                }
                Poll::Ready(None) => this.body = None,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Leading slice of a payload for log output, cut on a char boundary.
fn preview(payload: &str) -> &str {
    const PREVIEW_LEN: usize = 120;
    match payload.char_indices().nth(PREVIEW_LEN) {
        Some((end, _)) => &payload[..end],
        None => payload,
    }
}
