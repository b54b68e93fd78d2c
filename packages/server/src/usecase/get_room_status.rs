//! UseCase: Room の状態取得
//!
//! 状態の参照は Room の活動には数えない（fuse はリセットしない）。

use std::sync::Arc;

use crate::domain::{RoomRepository, RoomSnapshot};

use super::{error::GetRoomStatusError, find_room};

pub struct GetRoomStatusUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomStatusUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_id: &str) -> Result<RoomSnapshot, GetRoomStatusError> {
        let room = find_room(&self.repository, room_id)
            .await
            .map_err(|_| GetRoomStatusError::RoomNotFound)?;
        Ok(room.snapshot().await)
    }

    /// 稼働中の Room 数（ヘルスチェック用）
    pub async fn count_rooms(&self) -> usize {
        self.repository.count_rooms().await
    }
}
