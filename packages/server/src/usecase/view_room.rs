//! UseCase: チャットページの表示
//!
//! ページ表示は Room の活動には数えない（fuse はリセットしない）。

use std::sync::Arc;

use crate::domain::{Client, MessageRenderer, RoomRepository};

use super::{error::ViewRoomError, find_room};

pub struct ViewRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    renderer: Arc<dyn MessageRenderer>,
}

impl ViewRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, renderer: Arc<dyn MessageRenderer>) -> Self {
        Self {
            repository,
            renderer,
        }
    }

    /// `viewer` に向けたチャットページの HTML を返す
    pub async fn execute(&self, room_id: &str, viewer: &Client) -> Result<String, ViewRoomError> {
        let room = find_room(&self.repository, room_id)
            .await
            .map_err(|_| ViewRoomError::RoomNotFound)?;
        let snapshot = room.snapshot().await;

        self.renderer
            .render_room_page(&snapshot, viewer)
            .map_err(|e| ViewRoomError::RenderFailed(e.to_string()))
    }
}
