//! Server-Sent Events を使った EventSink 実装
//!
//! ## 設計ノート
//!
//! DeliveryLoop とレスポンスボディの間は容量付きの `mpsc` チャンネルで繋ぐ。
//!
//! - DeliveryLoop 側: `SseEventSink`（`push` で `Event` を送る）
//! - レスポンス側: `SseStream`（`Sse::new` に渡すストリーム）
//!
//! クライアントが切断すると axum がレスポンスボディを破棄し、受信側が閉じる。
//! それにより `EventSink::closed` が完了する。

use std::{convert::Infallible, pin::Pin};

use async_trait::async_trait;
use axum::response::sse::Event;
use futures_util::{Stream, stream};
use tokio::sync::mpsc;

use crate::domain::{EventSink, Frame, TransportError};

/// SSE のイベント名
pub const MESSAGE_EVENT: &str = "message";
pub const ERROR_EVENT: &str = "error";
pub const INTERNAL_ERROR_DATA: &str = "internal error";

/// `Sse::new` に渡すストリーム
pub type SseStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

pub struct SseEventSink {
    sender: mpsc::Sender<Event>,
}

impl SseEventSink {
    /// sink と、それに対応するレスポンス用ストリームを作成
    pub fn channel(capacity: usize) -> (Self, SseStream) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let stream = stream::unfold(receiver, |mut receiver| async move {
            receiver
                .recv()
                .await
                .map(|event| (Ok::<_, Infallible>(event), receiver))
        });
        (Self { sender }, Box::pin(stream))
    }
}

/// `Frame` を SSE の `Event` に変換する
pub fn frame_to_event(frame: Frame) -> Event {
    match frame {
        Frame::Message(data) => Event::default().event(MESSAGE_EVENT).data(data),
        Frame::InternalError => Event::default().event(ERROR_EVENT).data(INTERNAL_ERROR_DATA),
    }
}

#[async_trait]
impl EventSink for SseEventSink {
    async fn push(&self, frame: Frame) -> Result<(), TransportError> {
        self.sender
            .send(frame_to_event(frame))
            .await
            .map_err(|_| TransportError::Closed)
    }

    async fn closed(&self) {
        self.sender.closed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_pushed_frames_come_out_of_stream() {
        // テスト項目: push したイベントがストリームから順番に取り出せる
        // given (前提条件):
        let (sink, mut stream) = SseEventSink::channel(4);

        // when (操作):
        sink.push(Frame::Message("<p>hi</p>".to_string()))
            .await
            .unwrap();
        sink.push(Frame::InternalError).await.unwrap();
        drop(sink);

        // then (期待する結果): sink を破棄するとストリームも終わる
        assert!(matches!(stream.next().await, Some(Ok(_))));
        assert!(matches!(stream.next().await, Some(Ok(_))));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_push_fails_after_stream_dropped() {
        // テスト項目: レスポンスストリームが破棄されると push は Closed になり、closed() が完了する
        // given (前提条件):
        let (sink, stream) = SseEventSink::channel(4);

        // when (操作):
        drop(stream);

        // then (期待する結果):
        assert_eq!(
            sink.push(Frame::Message("late".to_string())).await,
            Err(TransportError::Closed)
        );
        tokio::time::timeout(Duration::from_secs(1), sink.closed())
            .await
            .expect("closed() should resolve once the stream is dropped");
    }
}
