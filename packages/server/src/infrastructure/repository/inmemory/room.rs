//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリのレジストリとして使用します。
//!
//! ## fuse タスク
//!
//! `create_room` は Room ごとに 1 つの tokio タスクを起動し、`Room::burn` の完了を待って
//! レジストリから削除する。タスクはレジストリのマップを `Weak` で保持するので、
//! Repository が破棄された後に残るタイマーがマップを生かし続けることはない。

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};

use async_trait::async_trait;
use fuse_chat_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{Room, RoomConfig, RoomError, RoomId, RoomIdFactory, RoomRepository};

type RoomMap = Mutex<HashMap<RoomId, Arc<Room>>>;

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// Room ID → Room
    rooms: Arc<RoomMap>,
    /// 新しい Room の設定（idle_timeout は `create_room` の引数で上書きする）
    template: RoomConfig,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(template: RoomConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            template,
            clock,
        }
    }

    fn spawn_fuse(&self, room: Arc<Room>) {
        let rooms = Arc::downgrade(&self.rooms);
        tokio::spawn(async move {
            room.burn().await;
            remove_from(&rooms, room.id()).await;
        });
    }
}

async fn remove_from(rooms: &Weak<RoomMap>, id: &RoomId) {
    let Some(rooms) = rooms.upgrade() else {
        return;
    };
    if rooms.lock().await.remove(id).is_some() {
        tracing::debug!(room_id = %id, "room removed from registry");
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, idle_timeout: Duration) -> Result<RoomId, RoomError> {
        let config = RoomConfig {
            idle_timeout,
            ..self.template
        };
        let id = RoomIdFactory::generate();
        let room = Arc::new(Room::new(id.clone(), config, self.clock.clone())?);

        self.rooms.lock().await.insert(id.clone(), room.clone());
        self.spawn_fuse(room);

        tracing::info!(
            room_id = %id,
            idle_timeout_secs = idle_timeout.as_secs_f64(),
            "room created"
        );
        Ok(id)
    }

    async fn get_room(&self, id: &RoomId) -> Result<Arc<Room>, RoomError> {
        let rooms = self.rooms.lock().await;
        match rooms.get(id) {
            Some(room) if !room.is_closed() => Ok(room.clone()),
            _ => Err(RoomError::NotFound(id.as_str().to_string())),
        }
    }

    async fn remove_room(&self, id: &RoomId) {
        remove_from(&Arc::downgrade(&self.rooms), id).await;
    }

    async fn count_rooms(&self) -> usize {
        self.rooms.lock().await.len()
    }

    async fn close_all(&self) {
        // Room のロックを取る前にレジストリのロックを解放する
        let rooms: Vec<Arc<Room>> = self.rooms.lock().await.values().cloned().collect();
        for room in &rooms {
            room.close().await;
        }
        tracing::info!(rooms = rooms.len(), "all rooms closed");
    }
}
