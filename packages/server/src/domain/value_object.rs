//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a user identifier in bytes
pub const USER_ID_MAX_LEN: usize = 100;

/// Maximum length of a message body in bytes
pub const MESSAGE_TEXT_MAX_LEN: usize = 10_000;

/// User identifier value object.
///
/// Identifies the owner of a connection, and the sender or receiver of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Arguments
    ///
    /// * `id` - The user identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the UserId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        let len = id.len();
        if len > USER_ID_MAX_LEN {
            return Err(ValueObjectError::UserIdTooLong {
                max: USER_ID_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message body value object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Create a new MessageText.
    ///
    /// # Returns
    ///
    /// A Result containing the MessageText or an error if validation fails
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        let len = text.len();
        if len > MESSAGE_TEXT_MAX_LEN {
            return Err(ValueObjectError::MessageTextTooLong {
                max: MESSAGE_TEXT_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(text))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned message identifier.
///
/// Only messages that went through the persistent store carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(i64);

impl MessageId {
    /// Create a new MessageId.
    pub fn new(value: i64) -> Result<Self, ValueObjectError> {
        if value <= 0 {
            return Err(ValueObjectError::MessageIdNotPositive(value));
        }
        Ok(Self(value))
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one live connection.
///
/// Two connections of the same user never share a ConnectionId, which lets the
/// registry tell a superseded connection apart from its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_new_success() {
        // テスト項目: 有効なユーザー ID を作成できる
        // given (前提条件):
        let id = "alice".to_string();

        // when (操作):
        let result = UserId::new(id);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_user_id_empty_error() {
        // テスト項目: 空のユーザー ID はエラーになる
        // when (操作):
        let result = UserId::new(String::new());

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::UserIdEmpty));
    }

    #[test]
    fn test_user_id_too_long_error() {
        // テスト項目: 上限を超えるユーザー ID はエラーになる
        // given (前提条件):
        let id = "a".repeat(USER_ID_MAX_LEN + 1);

        // when (操作):
        let result = UserId::new(id);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::UserIdTooLong {
                max: USER_ID_MAX_LEN,
                actual: USER_ID_MAX_LEN + 1,
            })
        );
    }

    #[test]
    fn test_user_id_boundary_length_ok() {
        // テスト項目: ちょうど上限の長さのユーザー ID は作成できる
        let id = "a".repeat(USER_ID_MAX_LEN);
        assert!(UserId::new(id).is_ok());
    }

    #[test]
    fn test_message_text_empty_is_allowed() {
        // テスト項目: 空のメッセージ本文も有効な本文として扱われる
        let result = MessageText::new(String::new());
        assert_eq!(result.map(MessageText::into_string), Ok(String::new()));
    }

    #[test]
    fn test_message_text_too_long_error() {
        // テスト項目: 上限を超えるメッセージ本文はエラーになる
        let text = "x".repeat(MESSAGE_TEXT_MAX_LEN + 1);
        let result = MessageText::new(text);
        assert!(matches!(
            result,
            Err(ValueObjectError::MessageTextTooLong { .. })
        ));
    }

    #[test]
    fn test_message_id_must_be_positive() {
        // テスト項目: MessageId は正の整数のみ受け付ける
        assert!(MessageId::new(1).is_ok());
        assert_eq!(
            MessageId::new(0),
            Err(ValueObjectError::MessageIdNotPositive(0))
        );
        assert_eq!(
            MessageId::new(-3),
            Err(ValueObjectError::MessageIdNotPositive(-3))
        );
    }
}
