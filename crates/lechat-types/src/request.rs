//! Request payload for the chat endpoint.

use crate::model::ModelId;
use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

/// Client-side prompt context sent with web-search requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPromptData {
    /// Today's date, `YYYY-MM-DD`, computed at payload construction time.
    pub current_date: String,
}

/// The JSON body of one chat request.
///
/// Transient: built fresh per call with a newly generated `messageId`, never
/// persisted or reused.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub chat_id: String,
    pub message_id: Uuid,
    pub model: ModelId,
    pub message_input: String,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_prompt_data: Option<ClientPromptData>,
}

impl ChatPayload {
    /// Payload for a plain chat message.
    pub fn chat(chat_id: &str, text: &str, model: ModelId) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            message_id: Uuid::new_v4(),
            model,
            message_input: text.to_string(),
            mode: "append".to_string(),
            features: None,
            client_prompt_data: None,
        }
    }

    /// Payload for a web-search-augmented message. Always uses the dedicated
    /// search model and carries the search feature flag plus today's date.
    pub fn web_search(chat_id: &str, text: &str) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            message_id: Uuid::new_v4(),
            model: ModelId::WebSearch,
            message_input: text.to_string(),
            mode: "append".to_string(),
            features: Some(vec!["beta-websearch".to_string()]),
            client_prompt_data: Some(ClientPromptData {
                current_date: Local::now().format("%Y-%m-%d").to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_payload_shape() {
        let payload = ChatPayload::chat("chat-1", "hello", ModelId::Codestral);
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["chatId"], "chat-1");
        assert_eq!(json["model"], "codestral");
        assert_eq!(json["messageInput"], "hello");
        assert_eq!(json["mode"], "append");
        // Plain chat never carries the search fields
        assert!(json.get("features").is_none());
        assert!(json.get("clientPromptData").is_none());
    }

    #[test]
    fn web_search_payload_shape() {
        let payload = ChatPayload::web_search("chat-1", "latest news");
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["model"], "pandragon");
        assert_eq!(json["features"], serde_json::json!(["beta-websearch"]));

        let date = json["clientPromptData"]["currentDate"].as_str().unwrap();
        // YYYY-MM-DD
        assert_eq!(date.len(), 10);
        let parts: Vec<&str> = date.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 4);
        assert_eq!(parts[1].len(), 2);
        assert_eq!(parts[2].len(), 2);
        assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn message_id_is_fresh_per_payload() {
        let a = ChatPayload::chat("chat-1", "hi", ModelId::default());
        let b = ChatPayload::chat("chat-1", "hi", ModelId::default());
        assert_ne!(a.message_id, b.message_id);

        let c = ChatPayload::web_search("chat-1", "hi");
        assert_ne!(a.message_id, c.message_id);
    }
}
