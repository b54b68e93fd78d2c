//! Domain errors

use thiserror::Error;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("client id must not be empty")]
    EmptyClientId,

    #[error("invalid client id: '{0}'")]
    InvalidClientId(String),

    #[error("client name must not be empty")]
    EmptyClientName,

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("invalid room id: '{0}'")]
    InvalidRoomId(String),
}

/// Room 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// Room が存在しない、または既に期限切れ
    #[error("room '{0}' not found")]
    NotFound(String),

    #[error("idle timeout must be greater than zero")]
    InvalidIdleTimeout,
}

/// メッセージ描画のエラー（致命的なのはその接続のみ）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("render failed: {0}")]
    Failed(String),
}

/// 配信先（トランスポート）のエラー
///
/// クライアントが切断済みであることを表す。ユーザーには報告せず、通常の leave 処理に入る。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
}
