//! Value objects
//!
//! 生の `String` / `i64` をドメインの型で包み、生成時にバリデーションを行う。

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Room の ID（UUID v4 形式）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoomId(String);

impl RoomId {
    /// 文字列から RoomId を作成（UUID として解釈できない場合はエラー）
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        Uuid::parse_str(&id).map_err(|_| ValueObjectError::InvalidRoomId(id.clone()))?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// RoomId の生成
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// 128bit のランダム値から新しい RoomId を生成
    pub fn generate() -> RoomId {
        RoomId(Uuid::new_v4().to_string())
    }
}

/// Room 内の 1 接続（SSE ストリーム 1 本）の ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// クライアント ID（外部の identifier から渡される不透明な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClientId(String);

impl ClientId {
    /// 新しいクライアントに割り当てる UUID v4 の ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::EmptyClientId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// クライアントの表示名
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientName(String);

impl ClientName {
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }

    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.trim().is_empty() {
            return Err(ValueObjectError::EmptyClientName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// メッセージ本文
///
/// 空文字列・空白のみの文字列は受け付けない。前後の空白はそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        if content.trim().is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_factory_generates_unique_uuid() {
        // テスト項目: 生成された RoomId は UUID として妥当で、毎回異なる
        // given (前提条件):

        // when (操作):
        let id1 = RoomIdFactory::generate();
        let id2 = RoomIdFactory::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
        assert!(RoomId::new(id1.as_str().to_string()).is_ok());
    }

    #[test]
    fn test_room_id_rejects_non_uuid() {
        // テスト項目: UUID 形式でない文字列は RoomId にできない
        // given (前提条件):
        let raw = "not-a-room".to_string();

        // when (操作):
        let result = RoomId::new(raw);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::InvalidRoomId("not-a-room".to_string()))
        );
    }

    #[test]
    fn test_message_content_rejects_blank() {
        // テスト項目: 空文字列・空白のみのメッセージは EmptyMessage になる
        // given (前提条件):
        let inputs = ["", "   ", "\n\t"];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert_eq!(
                MessageContent::new(input.to_string()),
                Err(ValueObjectError::EmptyMessage)
            );
        }
    }

    #[test]
    fn test_message_content_keeps_surrounding_whitespace() {
        // テスト項目: メッセージ本文の前後の空白は保持される
        // given (前提条件):
        let raw = "  hi  ".to_string();

        // when (操作):
        let content = MessageContent::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(content.as_str(), "  hi  ");
    }

    #[test]
    fn test_client_id_and_name_reject_empty() {
        // テスト項目: 空の ClientId / ClientName はエラーになる
        // given (前提条件):

        // when (操作):
        let id = ClientId::new(String::new());
        let name = ClientName::new(" ".to_string());

        // then (期待する結果):
        assert_eq!(id, Err(ValueObjectError::EmptyClientId));
        assert_eq!(name, Err(ValueObjectError::EmptyClientName));
    }
}
