//! Entities

use serde::Serialize;

use super::value_object::{ClientId, ClientName, MessageContent, Timestamp};

/// チャットの参加者（識別子と表示名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
}

impl Client {
    pub fn new(id: ClientId, name: ClientName) -> Self {
        Self { id, name }
    }
}

/// 投稿されたメッセージ（生成後は不変）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub content: MessageContent,
    pub author: Client,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(content: MessageContent, author: Client, created_at: Timestamp) -> Self {
        Self {
            content,
            author,
            created_at,
        }
    }

    /// `viewer` がこのメッセージの投稿者かどうか
    pub fn is_authored_by(&self, viewer: &ClientId) -> bool {
        &self.author.id == viewer
    }
}
