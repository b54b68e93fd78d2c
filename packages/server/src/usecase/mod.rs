//! UseCase layer
//!
//! 1 つのユーザー操作につき 1 つのユースケース。UI 層はここだけを呼び出す。

pub mod close_rooms;
pub mod create_room;
pub mod error;
pub mod get_room_status;
pub mod post_message;
pub mod subscribe_room;
pub mod view_room;

pub use close_rooms::CloseRoomsUseCase;
pub use create_room::CreateRoomUseCase;
pub use error::{
    CreateRoomError, GetRoomStatusError, PostMessageError, SubscribeError, ViewRoomError,
};
pub use get_room_status::GetRoomStatusUseCase;
pub use post_message::PostMessageUseCase;
pub use subscribe_room::SubscribeRoomUseCase;
pub use view_room::ViewRoomUseCase;

use std::sync::Arc;

use crate::domain::{Room, RoomError, RoomId, RoomRepository};

/// URL から受け取った文字列で Room を探す。UUID でない ID は存在しない Room と同じ扱い
async fn find_room(
    repository: &Arc<dyn RoomRepository>,
    raw_room_id: &str,
) -> Result<Arc<Room>, RoomError> {
    let room_id = RoomId::new(raw_room_id.to_string())
        .map_err(|_| RoomError::NotFound(raw_room_id.to_string()))?;
    repository.get_room(&room_id).await
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{sync::Arc, time::Duration};

    use fuse_chat_shared::time::FixedClock;

    use crate::{
        domain::{Client, ClientId, ClientName, RoomConfig, RoomRepository},
        infrastructure::repository::InMemoryRoomRepository,
    };

    pub fn create_test_repository() -> Arc<dyn RoomRepository> {
        Arc::new(InMemoryRoomRepository::new(
            RoomConfig::default(),
            Arc::new(FixedClock::new(1672498800000)),
        ))
    }

    pub async fn create_test_room(repository: &Arc<dyn RoomRepository>) -> String {
        repository
            .create_room(Duration::from_secs(60))
            .await
            .unwrap()
            .into_string()
    }

    pub fn client(id: &str) -> Client {
        Client::new(
            ClientId::new(id.to_string()).unwrap(),
            ClientName::new(format!("{id}-name")).unwrap(),
        )
    }
}
