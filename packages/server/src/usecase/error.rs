//! UseCase 層のエラー

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("idle timeout must be greater than zero")]
    InvalidIdleTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewRoomError {
    #[error("room not found")]
    RoomNotFound,

    #[error("failed to render room page: {0}")]
    RenderFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostMessageError {
    #[error("room not found")]
    RoomNotFound,

    #[error("message must not be empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    #[error("room not found")]
    RoomNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomStatusError {
    #[error("room not found")]
    RoomNotFound,
}
