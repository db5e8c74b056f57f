//! Streaming client for the Le Chat web conversation endpoint.

mod client;
mod stream;

pub use client::{CHAT_ENDPOINT, ChatClient, FragmentSink, MAX_PROMPT_CHARS};
pub use stream::TextStream;
