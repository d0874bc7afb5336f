//! Wire payload for messages, shared by WebSocket frames and `POST /send`.

use serde::{Deserialize, Serialize};

use crate::domain::{Message, MessageText, UserId, ValueObjectError};

/// Message as it travels over the wire
///
/// `id` and `is_read` are assigned by the store; clients may omit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
    #[serde(default)]
    pub is_read: bool,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().map(|id| id.value()),
            sender_id: message.sender().as_str().to_string(),
            receiver_id: message.receiver().as_str().to_string(),
            text: message.text().as_str().to_string(),
            is_read: message.is_delivered(),
        }
    }
}

impl TryFrom<MessageDto> for Message {
    type Error = ValueObjectError;

    /// Inbound conversion. Client-supplied `id` and `is_read` are ignored.
    fn try_from(dto: MessageDto) -> Result<Self, Self::Error> {
        let sender = UserId::try_from(dto.sender_id)?;
        let receiver = UserId::try_from(dto.receiver_id)?;
        let text = MessageText::try_from(dto.text)?;
        Ok(Message::new(sender, receiver, text))
    }
}

/// Reasons an inbound frame is dropped
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid message: {0}")]
    Invalid(#[from] ValueObjectError),
}

/// Decode an inbound text frame into a message.
pub fn decode_frame(text: &str) -> Result<Message, DecodeError> {
    let dto: MessageDto = serde_json::from_str(text)?;
    Ok(Message::try_from(dto)?)
}

/// Encode a message as an outbound text frame.
pub fn encode_frame(message: &Message) -> Result<String, serde_json::Error> {
    serde_json::to_string(&MessageDto::from(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;

    #[test]
    fn test_decode_frame_without_store_fields() {
        // テスト項目: id / is_read を省略したフレームをデコードできる
        // given (前提条件):
        let frame = r#"{"sender_id":"A","receiver_id":"B","text":"hi"}"#;

        // when (操作):
        let message = decode_frame(frame).unwrap();

        // then (期待する結果):
        assert_eq!(message.sender().as_str(), "A");
        assert_eq!(message.receiver().as_str(), "B");
        assert_eq!(message.text().as_str(), "hi");
        assert_eq!(message.id(), None);
        assert!(!message.is_delivered());
    }

    #[test]
    fn test_decode_frame_ignores_client_store_fields() {
        // テスト項目: クライアントが送った id / is_read は無視される
        let frame = r#"{"id":99,"sender_id":"A","receiver_id":"B","text":"hi","is_read":true}"#;
        let message = decode_frame(frame).unwrap();
        assert_eq!(message.id(), None);
        assert!(!message.is_delivered());
    }

    #[test]
    fn test_decode_frame_malformed_json() {
        // テスト項目: JSON として不正なフレームは Json エラーになる
        let result = decode_frame("not json");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_frame_invalid_receiver() {
        // テスト項目: 受信者が空のフレームは Invalid エラーになる
        let frame = r#"{"sender_id":"A","receiver_id":"","text":"hi"}"#;
        let result = decode_frame(frame);
        assert!(matches!(
            result,
            Err(DecodeError::Invalid(ValueObjectError::UserIdEmpty))
        ));
    }

    #[test]
    fn test_encode_live_message_omits_id() {
        // テスト項目: 未保存メッセージのフレームには id が含まれない
        // given (前提条件):
        let message = decode_frame(r#"{"sender_id":"A","receiver_id":"B","text":"hi"}"#).unwrap();

        // when (操作):
        let frame = encode_frame(&message).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["sender_id"], "A");
        assert_eq!(value["receiver_id"], "B");
        assert_eq!(value["text"], "hi");
        assert_eq!(value["is_read"], false);
    }

    #[test]
    fn test_encode_stored_message_includes_id() {
        // テスト項目: 保存済みメッセージのフレームには id が含まれる
        let message = Message::restore(
            MessageId::new(12).unwrap(),
            UserId::new("A".to_string()).unwrap(),
            UserId::new("B".to_string()).unwrap(),
            MessageText::new("hi".to_string()).unwrap(),
            false,
        );
        let value: serde_json::Value =
            serde_json::from_str(&encode_frame(&message).unwrap()).unwrap();
        assert_eq!(value["id"], 12);
    }
}
