//! UseCase: 全 Room の停止（サーバーのシャットダウン時）

use std::sync::Arc;

use crate::domain::RoomRepository;

pub struct CloseRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl CloseRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全ての Room を期限切れにし、開いている配信ストリームを終了させる
    pub async fn execute(&self) {
        self.repository.close_all().await;
    }
}
