//! Chat endpoint client.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use lechat_types::{ChatError, ChatPayload, ModelId};
use reqwest::header::{COOKIE, HeaderValue};

use crate::stream::TextStream;

/// The production chat endpoint.
pub const CHAT_ENDPOINT: &str = "https://chat.mistral.ai/api/chat";

/// Maximum prompt length in characters (inclusive).
pub const MAX_PROMPT_CHARS: usize = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Callback invoked with each decoded fragment as it arrives.
pub type FragmentSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Client for the Le Chat web conversation endpoint.
///
/// Holds the session cookie and chat id, immutable after construction. Safe
/// to share across calls; a failed call never invalidates the client.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    cookie: HeaderValue,
    chat_id: String,
    endpoint: String,
    timeout: Duration,
    sink: Option<FragmentSink>,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("chat_id", &self.chat_id)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("sink", &self.sink.as_ref().map(|_| "Fn"))
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Create a new client. Performs no network activity.
    ///
    /// Fails with [`ChatError::Validation`] if either string is empty after
    /// trimming, or if the cookie is not a legal header value.
    pub fn new(cookie: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, ChatError> {
        let cookie = cookie.into();
        let chat_id = chat_id.into();

        if cookie.trim().is_empty() {
            return Err(ChatError::Validation {
                message: "cookie cannot be empty".to_string(),
            });
        }
        if chat_id.trim().is_empty() {
            return Err(ChatError::Validation {
                message: "chat id cannot be empty".to_string(),
            });
        }
        let cookie = HeaderValue::from_str(&cookie).map_err(|_| ChatError::Validation {
            message: "cookie contains characters not permitted in a header value".to_string(),
        })?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ChatError::Network(e.to_string()))?;

        Ok(Self {
            http,
            cookie,
            chat_id,
            endpoint: CHAT_ENDPOINT.to_string(),
            timeout: REQUEST_TIMEOUT,
            sink: None,
        })
    }

    /// Override the endpoint URL (test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the fixed connection/initial-response timeout (test servers).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Install a callback invoked with each decoded fragment as it arrives,
    /// before the full response is assembled.
    pub fn with_fragment_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Send a chat message and return the full response text.
    pub async fn chat(&self, text: &str, model: ModelId) -> Result<String, ChatError> {
        let stream = self.chat_stream(text, model).await?;
        self.collect(stream).await
    }

    /// Send a chat message and return the raw fragment stream.
    pub async fn chat_stream(&self, text: &str, model: ModelId) -> Result<TextStream, ChatError> {
        validate_prompt(text)?;
        let payload = ChatPayload::chat(&self.chat_id, text, model);
        self.send(&payload).await
    }

    /// Send a web-search-augmented message and return the full response text.
    ///
    /// Uses the dedicated search model; the payload carries the search feature
    /// flag and today's date.
    pub async fn web_search(&self, text: &str) -> Result<String, ChatError> {
        let stream = self.web_search_stream(text).await?;
        self.collect(stream).await
    }

    /// Send a web-search-augmented message and return the raw fragment stream.
    pub async fn web_search_stream(&self, text: &str) -> Result<TextStream, ChatError> {
        validate_prompt(text)?;
        let payload = ChatPayload::web_search(&self.chat_id, text);
        self.send(&payload).await
    }

    /// Issue the streaming POST and classify the response status.
    async fn send(&self, payload: &ChatPayload) -> Result<TextStream, ChatError> {
        tracing::debug!(
            "POST {} (model: {}, message: {})",
            self.endpoint,
            payload.model,
            payload.message_id
        );

        // The timeout bounds connection and response headers only; draining
        // the body stream afterwards is not time-boxed.
        let response = tokio::time::timeout(
            self.timeout,
            self.http
                .post(&self.endpoint)
                .header(COOKIE, self.cookie.clone())
                .json(payload)
                .send(),
        )
        .await
        .map_err(|_| ChatError::Network("request timed out".to_string()))?
        .map_err(classify_transport)?;

        if let Some(err) = classify_status(response.status().as_u16()) {
            return Err(err);
        }
        Ok(TextStream::new(response.bytes_stream()))
    }

    /// Drain the stream, echoing fragments to the sink, and assemble the
    /// final response with newlines removed.
    async fn collect(&self, mut stream: TextStream) -> Result<String, ChatError> {
        let mut response = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            if let Some(sink) = &self.sink {
                sink(&fragment);
            }
            response.push_str(&fragment);
        }
        Ok(response.replace('\n', ""))
    }
}

/// Validate a prompt before any network activity.
fn validate_prompt(text: &str) -> Result<(), ChatError> {
    if text.trim().is_empty() {
        return Err(ChatError::Validation {
            message: "prompt cannot be empty".to_string(),
        });
    }
    if text.chars().count() > MAX_PROMPT_CHARS {
        return Err(ChatError::Validation {
            message: format!("prompt is too long, maximum {MAX_PROMPT_CHARS} characters"),
        });
    }
    Ok(())
}

/// Map a response status to an error, or `None` for 200.
///
/// 404 and 500 map to `Auth` alongside 401: the endpoint reports an
/// invalidated session through any of the three.
fn classify_status(status: u16) -> Option<ChatError> {
    match status {
        200 => None,
        401 | 404 | 500 => Some(ChatError::Auth {
            message: "check your cookie and chat id".to_string(),
        }),
        429 => Some(ChatError::RateLimited),
        other => Some(ChatError::Network(format!("unexpected status {other}"))),
    }
}

/// Normalize a transport-level failure, keeping the cause identifiable.
fn classify_transport(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Network("request timed out".to_string())
    } else if e.is_connect() {
        ChatError::Network(format!("connection failed: {e}"))
    } else {
        ChatError::Network(format!("transport error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_cookie() {
        let err = ChatClient::new("", "chat-1").unwrap_err();
        assert!(matches!(err, ChatError::Validation { .. }));
    }

    #[test]
    fn new_rejects_whitespace_cookie() {
        let err = ChatClient::new("   ", "chat-1").unwrap_err();
        assert!(matches!(err, ChatError::Validation { .. }));
    }

    #[test]
    fn new_rejects_empty_chat_id() {
        let err = ChatClient::new("session=abc", "  ").unwrap_err();
        assert!(matches!(err, ChatError::Validation { .. }));
    }

    #[test]
    fn new_rejects_cookie_with_control_characters() {
        let err = ChatClient::new("session=abc\r\nevil", "chat-1").unwrap_err();
        assert!(matches!(err, ChatError::Validation { .. }));
    }

    #[test]
    fn new_accepts_valid_credentials() {
        assert!(ChatClient::new("session=abc", "chat-1").is_ok());
    }

    #[test]
    fn validate_rejects_empty_prompt() {
        assert!(matches!(
            validate_prompt(""),
            Err(ChatError::Validation { .. })
        ));
        assert!(matches!(
            validate_prompt("   \n\t"),
            Err(ChatError::Validation { .. })
        ));
    }

    #[test]
    fn validate_length_boundary_is_inclusive() {
        let at_limit = "a".repeat(MAX_PROMPT_CHARS);
        assert!(validate_prompt(&at_limit).is_ok());

        let over_limit = "a".repeat(MAX_PROMPT_CHARS + 1);
        assert!(matches!(
            validate_prompt(&over_limit),
            Err(ChatError::Validation { .. })
        ));
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        // 1000 three-byte characters is still within the limit
        let cjk = "\u{4e16}".repeat(MAX_PROMPT_CHARS);
        assert!(validate_prompt(&cjk).is_ok());
    }

    #[test]
    fn classify_auth_statuses() {
        for status in [401, 404, 500] {
            match classify_status(status) {
                Some(ChatError::Auth { .. }) => {}
                other => panic!("Expected Auth for {status}, got {other:?}"),
            }
        }
    }

    #[test]
    fn classify_rate_limit() {
        assert!(matches!(classify_status(429), Some(ChatError::RateLimited)));
    }

    #[test]
    fn classify_other_statuses_carry_the_code() {
        for status in [400u16, 403, 502, 503] {
            match classify_status(status) {
                Some(ChatError::Network(msg)) => {
                    assert!(msg.contains(&status.to_string()), "message: {msg}");
                }
                other => panic!("Expected Network for {status}, got {other:?}"),
            }
        }
    }

    #[test]
    fn classify_success() {
        assert!(classify_status(200).is_none());
    }
}
