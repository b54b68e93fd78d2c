//! UseCase: Room の作成

use std::{sync::Arc, time::Duration};

use crate::domain::{RoomError, RoomId, RoomRepository};

use super::error::CreateRoomError;

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    /// 新しい Room に設定する無操作タイムアウト
    idle_timeout: Duration,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, idle_timeout: Duration) -> Self {
        Self {
            repository,
            idle_timeout,
        }
    }

    /// 新しい Room を作成し、その ID を返す
    ///
    /// 作成と同時に Room の fuse が点火される。
    pub async fn execute(&self) -> Result<RoomId, CreateRoomError> {
        self.repository
            .create_room(self.idle_timeout)
            .await
            .map_err(|e| match e {
                RoomError::InvalidIdleTimeout | RoomError::NotFound(_) => {
                    CreateRoomError::InvalidIdleTimeout
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::create_test_repository;

    #[tokio::test]
    async fn test_create_room_registers_room() {
        // テスト項目: 作成した Room がレジストリに登録され、ID で取得できる
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = CreateRoomUseCase::new(repository.clone(), Duration::from_secs(60));

        // when (操作):
        let room_id = usecase.execute().await.unwrap();

        // then (期待する結果):
        let room = repository.get_room(&room_id).await.unwrap();
        assert_eq!(room.config().idle_timeout, Duration::from_secs(60));
        assert_eq!(repository.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_create_room_with_zero_timeout_fails() {
        // テスト項目: idle_timeout が 0 のユースケースは Room を作らない
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = CreateRoomUseCase::new(repository.clone(), Duration::ZERO);

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(result, Err(CreateRoomError::InvalidIdleTimeout));
        assert_eq!(repository.count_rooms().await, 0);
    }
}
