use serde::{Deserialize, Serialize};

/// Markup mode for message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    /// Telegram's HTML subset (`<b>`, `<i>`, `<a>`, ...).
    #[serde(rename = "HTML")]
    Html,
}

/// Request body for `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    /// Target chat identifier or `@channelusername`.
    pub chat_id: String,

    /// Message text, 1-4096 characters after entity parsing.
    pub text: String,

    /// How `text` should be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
}

/// Envelope every Bot API method responds with.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramApiResponse<T> {
    /// Whether the request succeeded.
    pub ok: bool,

    /// Method result, present when `ok` is `true`.
    pub result: Option<T>,

    /// Human-readable error, present when `ok` is `false`.
    pub description: Option<String>,

    /// Extra information for automatic error handling.
    pub parameters: Option<ResponseParameters>,
}

/// Hints attached to some error responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait before repeating a rate-limited request.
    pub retry_after: Option<u64>,
}

/// The part of a sent `Message` the relay cares about.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SentMessage {
    /// Unique message identifier inside the chat.
    pub message_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message_serializes_html_mode() {
        let req = SendMessageRequest {
            chat_id: "-100".into(),
            text: "hello".into(),
            parse_mode: Some(ParseMode::Html),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["chat_id"], "-100");
        assert_eq!(json["text"], "hello");
        assert_eq!(json["parse_mode"], "HTML");
    }

    #[test]
    fn send_message_omits_missing_parse_mode() {
        let req = SendMessageRequest {
            chat_id: "42".into(),
            text: "plain".into(),
            parse_mode: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("parse_mode").is_none());
    }

    #[test]
    fn error_response_deserializes() {
        let json = r#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 7","parameters":{"retry_after":7}}"#;
        let resp: TelegramApiResponse<SentMessage> = serde_json::from_str(json).unwrap();
        assert!(!resp.ok);
        assert!(resp.result.is_none());
        assert_eq!(resp.parameters.and_then(|p| p.retry_after), Some(7));
    }

    #[test]
    fn success_response_deserializes() {
        let json = r#"{"ok":true,"result":{"message_id":17,"chat":{"id":-100},"date":0,"text":"hi"}}"#;
        let resp: TelegramApiResponse<SentMessage> = serde_json::from_str(json).unwrap();
        assert!(resp.ok);
        assert_eq!(resp.result, Some(SentMessage { message_id: 17 }));
    }
}
