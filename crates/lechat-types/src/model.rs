//! Model identifiers accepted by the chat endpoint.

use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A server-side model name. Closed set; purely a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "mistral-large-2407")]
    Large2,
    #[serde(rename = "codestral")]
    Codestral,
    #[serde(rename = "mistral-nemo")]
    Nemo,
    #[serde(rename = "pixtral-12b-2409")]
    Pixtral,
    /// Dedicated model behind the web-search mode. Not user-selectable for
    /// plain chat via the CLI, but still a legal payload value.
    #[serde(rename = "pandragon")]
    WebSearch,
}

impl ModelId {
    /// All selectable models, for help output.
    pub const ALL: [ModelId; 5] = [
        ModelId::Large2,
        ModelId::Codestral,
        ModelId::Nemo,
        ModelId::Pixtral,
        ModelId::WebSearch,
    ];

    /// The wire name sent in the request payload.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::Large2 => "mistral-large-2407",
            ModelId::Codestral => "codestral",
            ModelId::Nemo => "mistral-nemo",
            ModelId::Pixtral => "pixtral-12b-2409",
            ModelId::WebSearch => "pandragon",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = ChatError;

    /// Parse a wire name. An unrecognized name is reported as
    /// [`ChatError::ModelUnavailable`] — the set is closed, so anything
    /// outside it cannot be served.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ChatError::ModelUnavailable {
                model: s.to_string(),
            })
    }
}
