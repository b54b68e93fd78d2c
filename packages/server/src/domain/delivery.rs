//! DeliveryLoop: 1 接続ぶんの配信ループ
//!
//! 次の 3 つのうち最初に準備できたものを 1 回の起床につき 1 つだけ処理する。
//!
//! 1. Room の期限切れ（`Subscription::closed`）: 終了
//! 2. クライアントの切断（`EventSink::closed`）: 終了
//! 3. キューに届いたメッセージ: 描画してトランスポートに送る
//!
//! どの経路で終了しても最後に `Room::leave` を呼ぶ。

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    error::TransportError,
    renderer::MessageRenderer,
    room::{Room, Subscription},
};

/// トランスポートへ送るイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// 描画済みのメッセージ
    Message(String),
    /// 描画に失敗したことをクライアントに伝える
    InternalError,
}

/// 配信先（SSE レスポンスなど）の抽象化
#[async_trait]
pub trait EventSink: Send + Sync {
    /// イベントを送る。クライアントが切断済みなら `TransportError::Closed`
    async fn push(&self, frame: Frame) -> Result<(), TransportError>;

    /// クライアントが切断したときに完了する
    async fn closed(&self);
}

/// 配信ループの終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    RoomExpired,
    ClientDisconnected,
    /// キューが閉じられた（Room から外された）
    Evicted,
    RenderFailed,
}

pub struct DeliveryLoop<S> {
    room: Arc<Room>,
    subscription: Subscription,
    renderer: Arc<dyn MessageRenderer>,
    sink: S,
}

impl<S: EventSink> DeliveryLoop<S> {
    pub fn new(
        room: Arc<Room>,
        subscription: Subscription,
        renderer: Arc<dyn MessageRenderer>,
        sink: S,
    ) -> Self {
        Self {
            room,
            subscription,
            renderer,
            sink,
        }
    }

    pub async fn run(self) -> DeliveryOutcome {
        let Self {
            room,
            subscription,
            renderer,
            sink,
        } = self;
        let Subscription {
            connection_id,
            client,
            mut receiver,
            closed,
        } = subscription;

        let outcome = loop {
            tokio::select! {
                biased;

                _ = closed.cancelled() => break DeliveryOutcome::RoomExpired,
                _ = sink.closed() => break DeliveryOutcome::ClientDisconnected,
                received = receiver.recv() => {
                    let Some(message) = received else {
                        break DeliveryOutcome::Evicted;
                    };

                    let is_author = message.is_authored_by(&client.id);
                    match renderer.render_message(&message, is_author) {
                        Ok(rendered) => {
                            if sink.push(Frame::Message(rendered)).await.is_err() {
                                break DeliveryOutcome::ClientDisconnected;
                            }
                        }
                        Err(e) => {
                            tracing::error!(
                                room_id = %room.id(),
                                connection_id = %connection_id,
                                "failed to render message: {}",
                                e
                            );
                            let _ = sink.push(Frame::InternalError).await;
                            break DeliveryOutcome::RenderFailed;
                        }
                    }
                }
            }
        };

        room.leave(&connection_id).await;
        tracing::debug!(
            room_id = %room.id(),
            connection_id = %connection_id,
            ?outcome,
            "delivery loop finished"
        );
        outcome
    }
}
