//! Error taxonomy for lechat.

use thiserror::Error;

/// Errors from the chat endpoint client.
///
/// The taxonomy is flat and closed: every failure of a single call maps to
/// exactly one of these variants, and no internal recovery is attempted. A
/// failed call never invalidates the client itself.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Caller-supplied input violated a length/emptiness constraint.
    /// Detected before any network activity.
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The session cookie or chat id was rejected by the endpoint.
    ///
    /// 404 and 500 map here alongside 401: the endpoint answers with those
    /// when the session has been invalidated server-side, so they are treated
    /// as credential problems rather than generic server faults.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The endpoint signaled throttling (429).
    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    /// The named model is not available.
    #[error("Model '{model}' is currently unavailable")]
    ModelUnavailable { model: String },

    /// Any other non-200 status, or a transport-level failure.
    #[error("Network error: {0}")]
    Network(String),
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file parse error at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
