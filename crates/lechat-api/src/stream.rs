//! Async stream of decoded text fragments from a chat response.
//!
//! The endpoint answers with a line-delimited stream where only lines of the
//! form `0:"<fragment>"` carry content. Everything else (message metadata,
//! finish markers) is discarded.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use lechat_types::ChatError;
use pin_project_lite::pin_project;

/// Decode one stream line into its content fragment.
///
/// Content lines look like `0:"Hel"`: the `0:` tag, an opening quote, the
/// fragment, a closing quote. Returns `None` for any line that does not start
/// with the content tag.
pub(crate) fn decode_line(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("0:")?;
    let mut chars = rest.chars();
    chars.next(); // opening quote
    chars.next_back(); // closing quote
    Some(chars.as_str())
}

pin_project! {
    /// A single-pass stream of decoded text fragments.
    ///
    /// Wraps the raw byte stream of an HTTP response, buffers until complete
    /// lines are available, and yields one item per content line in arrival
    /// order. Once drained it cannot be replayed.
    pub struct TextStream {
        #[pin]
        inner: Pin<Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>>,
        buffer: Vec<u8>,
        pending: VecDeque<String>,
        done: bool,
    }
}

impl TextStream {
    /// Create a new TextStream from a reqwest byte stream.
    pub fn new(
        byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            buffer: Vec::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Split complete lines out of the buffer and queue their fragments.
    ///
    /// The buffer holds raw bytes and lines are cut on the newline byte
    /// before any text decoding, so a multi-byte character split across two
    /// transport chunks is reassembled intact (UTF-8 continuation bytes can
    /// never equal `\n`).
    fn drain_buffer(buffer: &mut Vec<u8>, pending: &mut VecDeque<String>) {
        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            Self::push_line(line.trim_end_matches(['\n', '\r']), pending);
        }
    }

    fn push_line(line: &str, pending: &mut VecDeque<String>) {
        match decode_line(line) {
            Some(fragment) => pending.push_back(fragment.to_string()),
            None => {
                let tag = line.split(':').next().unwrap_or("");
                tracing::debug!("Ignoring non-content stream line (tag: {tag})");
            }
        }
    }
}

impl Stream for TextStream {
    type Item = Result<String, ChatError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(fragment) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(fragment)));
            }
            if *this.done {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buffer.extend_from_slice(&bytes);
                    Self::drain_buffer(this.buffer, this.pending);
                }
                Poll::Ready(Some(Err(e))) => {
                    *this.done = true;
                    return Poll::Ready(Some(Err(ChatError::Network(e.to_string()))));
                }
                Poll::Ready(None) => {
                    *this.done = true;
                    // The last line may arrive without a terminator
                    if !this.buffer.is_empty() {
                        let bytes = std::mem::take(this.buffer);
                        let line = String::from_utf8_lossy(&bytes);
                        Self::push_line(line.trim_end_matches('\r'), this.pending);
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
