//! Shared application state.

use std::{sync::Arc, time::Duration};

use crate::{
    config::ServerConfig,
    domain::{ClientIdentifier, MessageRenderer, RoomRepository},
    usecase::{
        CloseRoomsUseCase, CreateRoomUseCase, GetRoomStatusUseCase, PostMessageUseCase,
        SubscribeRoomUseCase, ViewRoomUseCase,
    },
};

/// Shared application state
///
/// ハンドラはここに置かれたユースケースだけを使う。Repository を直接触らない。
pub struct AppState {
    pub create_room_usecase: CreateRoomUseCase,
    pub view_room_usecase: ViewRoomUseCase,
    pub post_message_usecase: PostMessageUseCase,
    pub subscribe_room_usecase: SubscribeRoomUseCase,
    pub get_room_status_usecase: GetRoomStatusUseCase,
    pub close_rooms_usecase: CloseRoomsUseCase,
    /// Cookie からクライアントを決める
    pub identifier: Arc<dyn ClientIdentifier>,
    pub keep_alive: Duration,
    pub sse_buffer: usize,
}

impl AppState {
    /// 依存を受け取り、全てのユースケースを組み立てる
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        renderer: Arc<dyn MessageRenderer>,
        identifier: Arc<dyn ClientIdentifier>,
        config: &ServerConfig,
    ) -> Self {
        Self {
            create_room_usecase: CreateRoomUseCase::new(
                repository.clone(),
                config.room.idle_timeout,
            ),
            view_room_usecase: ViewRoomUseCase::new(repository.clone(), renderer.clone()),
            post_message_usecase: PostMessageUseCase::new(repository.clone()),
            subscribe_room_usecase: SubscribeRoomUseCase::new(repository.clone(), renderer),
            get_room_status_usecase: GetRoomStatusUseCase::new(repository.clone()),
            close_rooms_usecase: CloseRoomsUseCase::new(repository),
            identifier,
            keep_alive: config.keep_alive,
            sse_buffer: config.sse_buffer,
        }
    }
}
