//! UseCase: メッセージ投稿
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostMessageUseCase::execute() メソッド
//! - 投稿が Room の全接続に配信され、fuse が延長されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：投稿と配信
//! - 異常系：空メッセージ、存在しない Room、期限切れの Room

use std::sync::Arc;

use crate::domain::{ChatMessage, Client, MessageContent, RoomRepository};

use super::{error::PostMessageError, find_room};

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl PostMessageUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// `text` を `author` の投稿として Room に流す
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 受理されたメッセージ
    /// * `Err(PostMessageError)` - 本文が空、または Room が存在しない
    pub async fn execute(
        &self,
        room_id: &str,
        author: Client,
        text: String,
    ) -> Result<ChatMessage, PostMessageError> {
        let content = MessageContent::new(text).map_err(|_| PostMessageError::EmptyMessage)?;
        let room = find_room(&self.repository, room_id)
            .await
            .map_err(|_| PostMessageError::RoomNotFound)?;

        room.post(author, content)
            .await
            .map_err(|_| PostMessageError::RoomNotFound)
    }
}
