//! Shared types and error taxonomy for lechat.

pub mod error;
pub mod model;
pub mod request;

pub use error::{ChatError, ConfigError};
pub use model::ModelId;
pub use request::{ChatPayload, ClientPromptData};
