//! Telegram Bot API wire types
//!
//! Only the two methods the system uses are modeled: `getUpdates` and
//! `sendMessage`. Unknown fields from the API are ignored; optional
//! fields are tolerated as absent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TgChat {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TgMessageFrom {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TgMessage {
    #[serde(default)]
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<TgMessageFrom>,
    pub chat: TgChat,
    #[serde(default)]
    pub text: Option<String>,
}

/// One element of a `getUpdates` batch. Updates that carry no message
/// (edits, callbacks, ...) still advance the offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TgUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TgMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUpdatesResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<TgUpdate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<TgMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_updates_deserialization() {
        let json = r#"{
            "ok": true,
            "result": [{
                "update_id": 735,
                "message": {
                    "message_id": 12,
                    "from": {"id": 99, "is_bot": false, "username": "alice"},
                    "chat": {"id": 12345, "username": "alice", "first_name": "Alice", "type": "private"},
                    "date": 1640995200,
                    "text": "/start"
                }
            }]
        }"#;

        let response: GetUpdatesResponse = serde_json::from_str(json).unwrap();
        assert!(response.ok);
        assert_eq!(response.result.len(), 1);

        let update = &response.result[0];
        assert_eq!(update.update_id, 735);
        let message = update.message.as_ref().unwrap();
        assert_eq!(message.chat.id, 12345);
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(
            message.from.as_ref().and_then(|f| f.username.as_deref()),
            Some("alice")
        );
    }

    #[test]
    fn test_update_without_message_tolerated() {
        let json = r#"{"ok": true, "result": [{"update_id": 1, "edited_message": {}}]}"#;
        let response: GetUpdatesResponse = serde_json::from_str(json).unwrap();
        assert!(response.result[0].message.is_none());
    }

    #[test]
    fn test_empty_batch() {
        let json = r#"{"ok": true, "result": []}"#;
        let response: GetUpdatesResponse = serde_json::from_str(json).unwrap();
        assert!(response.ok);
        assert!(response.result.is_empty());
    }
}
