//! UseCase: Room のイベントストリームへの参加
//!
//! Room に join し、その接続ぶんの DeliveryLoop を組み立てて返す。
//! ループの実行（spawn）は呼び出し側の責務。

use std::sync::Arc;

use crate::domain::{Client, DeliveryLoop, EventSink, MessageRenderer, RoomRepository};

use super::{error::SubscribeError, find_room};

pub struct SubscribeRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    renderer: Arc<dyn MessageRenderer>,
}

impl SubscribeRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, renderer: Arc<dyn MessageRenderer>) -> Self {
        Self {
            repository,
            renderer,
        }
    }

    pub async fn execute<S: EventSink>(
        &self,
        room_id: &str,
        client: Client,
        sink: S,
    ) -> Result<DeliveryLoop<S>, SubscribeError> {
        let room = find_room(&self.repository, room_id)
            .await
            .map_err(|_| SubscribeError::RoomNotFound)?;
        let subscription = room
            .join(client)
            .await
            .map_err(|_| SubscribeError::RoomNotFound)?;

        Ok(DeliveryLoop::new(
            room,
            subscription,
            self.renderer.clone(),
            sink,
        ))
    }
}
