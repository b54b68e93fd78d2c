//! Room aggregate
//!
//! 1 つのチャットルーム。参加者（接続）、メッセージ履歴、ExpiryFuse を所有する。
//!
//! ## ロック
//!
//! `join` / `leave` / `post` と fuse の期限チェックは同じ `Mutex<RoomState>` の中で行う。
//! そのため「メッセージを受け付けた直後に Room が消える」ことはない:
//! `post` が先にロックを取れば期限は延長され、fuse が先なら `post` は `NotFound` になる。
//!
//! ## 配信キュー（バックプレッシャー）
//!
//! 各接続のキューは容量付きの `mpsc` チャンネルで、fan-out は `try_send` のみを使う。
//!
//! - キューが満杯: その接続に対してだけ新しいメッセージを捨てる（drop-newest）
//! - 受信側が閉じている: その接続を Room から外す（evict）
//!
//! どちらの場合も投稿者と他の接続はブロックされない。

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
    time::Duration,
};

use fuse_chat_shared::time::Clock;
use tokio::{
    sync::{Mutex, mpsc, mpsc::error::TrySendError},
    time::Instant,
};
use tokio_util::sync::CancellationToken;

use super::{
    entity::{ChatMessage, Client},
    error::RoomError,
    fuse::ExpiryFuse,
    value_object::{ConnectionId, MessageContent, RoomId, Timestamp},
};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;
pub const DEFAULT_HISTORY_LIMIT: usize = 512;

/// Room ごとの設定（作成時に固定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomConfig {
    /// 最後の投稿からこの時間が経つと Room は消える
    pub idle_timeout: Duration,
    /// 接続ごとの配信キューの容量
    pub queue_capacity: usize,
    /// 保持する履歴の最大件数（`None` は無制限）
    pub history_limit: Option<usize>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

/// `join` の結果。DeliveryLoop が消費する
#[derive(Debug)]
pub struct Subscription {
    pub connection_id: ConnectionId,
    pub client: Client,
    pub receiver: mpsc::Receiver<ChatMessage>,
    /// Room の期限切れで cancel される
    pub closed: CancellationToken,
}

/// ステータス表示・ページ描画用の Room の写し
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub connections: usize,
    pub age: Duration,
    pub time_remaining: Duration,
    pub created_at: Timestamp,
    pub messages: Vec<ChatMessage>,
}

/// fan-out 1 回分の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOut {
    pub delivered: usize,
    pub dropped: usize,
    pub evicted: usize,
}

struct Connection {
    client: Client,
    sender: mpsc::Sender<ChatMessage>,
}

struct RoomState {
    fuse: ExpiryFuse,
    connections: HashMap<ConnectionId, Connection>,
    messages: VecDeque<ChatMessage>,
}

pub struct Room {
    id: RoomId,
    config: RoomConfig,
    created_at: Timestamp,
    started: Instant,
    clock: Arc<dyn Clock>,
    state: Mutex<RoomState>,
    closed: CancellationToken,
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Room {
    /// 新しい Room を作成し fuse を点火する（待機は `burn` で行う）
    pub fn new(id: RoomId, config: RoomConfig, clock: Arc<dyn Clock>) -> Result<Self, RoomError> {
        if config.idle_timeout.is_zero() {
            return Err(RoomError::InvalidIdleTimeout);
        }

        let started = Instant::now();
        Ok(Self {
            id,
            config,
            created_at: Timestamp::new(clock.now_millis()),
            started,
            clock,
            state: Mutex::new(RoomState {
                fuse: ExpiryFuse::armed(started, config.idle_timeout),
                connections: HashMap::new(),
                messages: VecDeque::new(),
            }),
            closed: CancellationToken::new(),
        })
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Room が期限切れ（または停止）になったかどうか
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    fn not_found(&self) -> RoomError {
        RoomError::NotFound(self.id.as_str().to_string())
    }

    /// 期限切れなら true。期限を過ぎたのにまだ fuse タスクが処理していなければ、ここで teardown する
    fn expire_if_due(&self, state: &mut RoomState, now: Instant) -> bool {
        if state.fuse.try_expire(now) {
            self.teardown(state, "idle timeout");
            return true;
        }
        state.fuse.is_expired()
    }

    /// 参加者を追加し、その接続の配信キューを返す
    pub async fn join(&self, client: Client) -> Result<Subscription, RoomError> {
        let mut state = self.state.lock().await;
        if self.expire_if_due(&mut state, Instant::now()) {
            return Err(self.not_found());
        }

        let connection_id = ConnectionId::generate();
        let (sender, receiver) = mpsc::channel(self.config.queue_capacity.max(1));
        state.connections.insert(
            connection_id.clone(),
            Connection {
                client: client.clone(),
                sender,
            },
        );

        tracing::info!(
            room_id = %self.id,
            connection_id = %connection_id,
            client_id = client.id.as_str(),
            connections = state.connections.len(),
            "client joined"
        );

        Ok(Subscription {
            connection_id,
            client,
            receiver,
            closed: self.closed.child_token(),
        })
    }

    /// 参加者を外す（冪等）。接続が存在した場合のみ true
    pub async fn leave(&self, connection_id: &ConnectionId) -> bool {
        let mut state = self.state.lock().await;
        let removed = state.connections.remove(connection_id).is_some();
        if removed {
            tracing::info!(
                room_id = %self.id,
                connection_id = %connection_id,
                connections = state.connections.len(),
                "client left"
            );
        }
        removed
    }

    /// メッセージを投稿する
    ///
    /// 履歴への追加、fuse の延長、全接続への fan-out を 1 つのクリティカルセクションで行う。
    pub async fn post(
        &self,
        author: Client,
        content: MessageContent,
    ) -> Result<ChatMessage, RoomError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        if self.expire_if_due(&mut state, now) || !state.fuse.reset(now) {
            return Err(self.not_found());
        }

        let message = ChatMessage::new(content, author, Timestamp::new(self.clock.now_millis()));

        state.messages.push_back(message.clone());
        if let Some(limit) = self.config.history_limit {
            while state.messages.len() > limit {
                state.messages.pop_front();
            }
        }

        let fan_out = fan_out(&self.id, &mut state.connections, &message);
        tracing::debug!(
            room_id = %self.id,
            delivered = fan_out.delivered,
            dropped = fan_out.dropped,
            evicted = fan_out.evicted,
            "message fanned out"
        );

        Ok(message)
    }

    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.connections.len()
    }

    pub fn age(&self) -> Duration {
        self.started.elapsed()
    }

    pub async fn time_remaining(&self) -> Duration {
        self.state.lock().await.fuse.remaining(Instant::now())
    }

    /// 履歴のコピー（古い順）
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.state.lock().await.messages.iter().cloned().collect()
    }

    pub async fn snapshot(&self) -> RoomSnapshot {
        let state = self.state.lock().await;
        RoomSnapshot {
            id: self.id.clone(),
            connections: state.connections.len(),
            age: self.age(),
            time_remaining: state.fuse.remaining(Instant::now()),
            created_at: self.created_at,
            messages: state.messages.iter().cloned().collect(),
        }
    }

    /// fuse が燃え尽きるまで待ち、Room を teardown する
    ///
    /// 期限チェックと teardown は Room のロック内で行う。期限前であればロックを解放して
    /// その時点の期限まで眠る。`post` による延長は期限を後ろにずらすだけなので、
    /// 古い期限で目覚めた場合は新しい期限を読み直して眠り直す。
    /// `close` が呼ばれた場合も即座に戻る。
    pub async fn burn(&self) {
        loop {
            let deadline = {
                let mut state = self.state.lock().await;
                if self.expire_if_due(&mut state, Instant::now()) {
                    return;
                }
                match state.fuse.deadline() {
                    Some(deadline) => deadline,
                    None => return,
                }
            };

            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {}
                _ = self.closed.cancelled() => {}
            }
        }
    }

    /// 期限を待たずに Room を閉じる（サーバー停止時）
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if state.fuse.expire_now() {
            self.teardown(&mut state, "closed");
        }
    }

    fn teardown(&self, state: &mut RoomState, reason: &str) {
        let connections = state.connections.len();
        state.connections.clear();
        self.closed.cancel();
        tracing::info!(
            room_id = %self.id,
            connections,
            messages = state.messages.len(),
            age_secs = self.age().as_secs(),
            reason,
            "room expired"
        );
    }
}

/// 全接続のキューに `try_send` する（待たない）
fn fan_out(
    room_id: &RoomId,
    connections: &mut HashMap<ConnectionId, Connection>,
    message: &ChatMessage,
) -> FanOut {
    let mut result = FanOut::default();

    connections.retain(|connection_id, connection| {
        match connection.sender.try_send(message.clone()) {
            Ok(()) => {
                result.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                result.dropped += 1;
                tracing::warn!(
                    room_id = %room_id,
                    connection_id = %connection_id,
                    client_id = connection.client.id.as_str(),
                    "delivery queue full, dropping message for this connection"
                );
                true
            }
            Err(TrySendError::Closed(_)) => {
                result.evicted += 1;
                tracing::warn!(
                    room_id = %room_id,
                    connection_id = %connection_id,
                    "delivery queue closed, evicting connection"
                );
                false
            }
        }
    });

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, ClientName, RoomIdFactory};
    use fuse_chat_shared::time::FixedClock;

    fn client(id: &str) -> Client {
        Client::new(
            ClientId::new(id.to_string()).unwrap(),
            ClientName::new(format!("{id}-name")).unwrap(),
        )
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string()).unwrap()
    }

    fn create_test_room(config: RoomConfig) -> Arc<Room> {
        Arc::new(
            Room::new(
                RoomIdFactory::generate(),
                config,
                Arc::new(FixedClock::new(1_000)),
            )
            .unwrap(),
        )
    }

    fn config_with_idle(idle_timeout: Duration) -> RoomConfig {
        RoomConfig {
            idle_timeout,
            ..RoomConfig::default()
        }
    }

    #[tokio::test]
    async fn test_new_room_rejects_zero_idle_timeout() {
        // テスト項目: idle_timeout が 0 の Room は作成できない
        // given (前提条件):
        let config = config_with_idle(Duration::ZERO);

        // when (操作):
        let result = Room::new(
            RoomIdFactory::generate(),
            config,
            Arc::new(FixedClock::new(0)),
        );

        // then (期待する結果):
        assert!(matches!(result, Err(RoomError::InvalidIdleTimeout)));
    }

    #[tokio::test]
    async fn test_join_and_leave_track_connection_count() {
        // テスト項目: join / leave の回数に応じて接続数が変わり、leave は冪等
        // given (前提条件):
        let room = create_test_room(RoomConfig::default());

        // when (操作):
        let a = room.join(client("alice")).await.unwrap();
        let b = room.join(client("bob")).await.unwrap();
        let _c = room.join(client("alice")).await.unwrap();
        let first_leave = room.leave(&a.connection_id).await;
        let second_leave = room.leave(&a.connection_id).await;

        // then (期待する結果):
        assert!(first_leave);
        assert!(!second_leave);
        assert_eq!(room.connection_count().await, 2);

        room.leave(&b.connection_id).await;
        assert_eq!(room.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_post_fans_out_in_order_to_every_connection() {
        // テスト項目: 投稿は全接続に投稿順で届き、履歴にも追加される
        // given (前提条件):
        let room = create_test_room(RoomConfig::default());
        let mut a = room.join(client("alice")).await.unwrap();
        let mut b = room.join(client("bob")).await.unwrap();

        // when (操作):
        room.post(client("alice"), content("one")).await.unwrap();
        room.post(client("bob"), content("two")).await.unwrap();

        // then (期待する結果):
        for subscription in [&mut a, &mut b] {
            let first = subscription.receiver.recv().await.unwrap();
            let second = subscription.receiver.recv().await.unwrap();
            assert_eq!(first.content.as_str(), "one");
            assert_eq!(second.content.as_str(), "two");
        }
        let history = room.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].author.id.as_str(), "alice");
        assert_eq!(history[0].created_at, Timestamp::new(1_000));
    }

    #[tokio::test]
    async fn test_post_after_leave_does_not_reach_removed_connection() {
        // テスト項目: leave した接続には以降のメッセージが届かない
        // given (前提条件):
        let room = create_test_room(RoomConfig::default());
        let mut a = room.join(client("alice")).await.unwrap();
        let mut b = room.join(client("bob")).await.unwrap();
        room.leave(&b.connection_id).await;

        // when (操作):
        room.post(client("alice"), content("hello")).await.unwrap();

        // then (期待する結果):
        assert_eq!(a.receiver.recv().await.unwrap().content.as_str(), "hello");
        // leave で sender が破棄されているのでチャンネルは閉じている
        assert!(b.receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_full_queue_drops_newest_for_slow_connection_only() {
        // テスト項目: キューが満杯の接続だけ新しいメッセージが捨てられ、他の接続には届く
        // given (前提条件):
        let config = RoomConfig {
            queue_capacity: 2,
            ..RoomConfig::default()
        };
        let room = create_test_room(config);
        let mut slow = room.join(client("slow")).await.unwrap();
        let mut fast = room.join(client("fast")).await.unwrap();

        // when (操作): slow は読まず、fast は毎回読む
        for text in ["m1", "m2", "m3"] {
            room.post(client("alice"), content(text)).await.unwrap();
            let received = fast.receiver.recv().await.unwrap();
            assert_eq!(received.content.as_str(), text);
        }

        // then (期待する結果): slow には先頭 2 件だけが残り、接続は維持される
        assert_eq!(slow.receiver.recv().await.unwrap().content.as_str(), "m1");
        assert_eq!(slow.receiver.recv().await.unwrap().content.as_str(), "m2");
        assert!(slow.receiver.try_recv().is_err());
        assert_eq!(room.connection_count().await, 2);
    }

    #[tokio::test]
    async fn test_closed_receiver_is_evicted_on_post() {
        // テスト項目: 受信側が破棄された接続は次の投稿で Room から外される
        // given (前提条件):
        let room = create_test_room(RoomConfig::default());
        let gone = room.join(client("gone")).await.unwrap();
        let _alive = room.join(client("alive")).await.unwrap();
        drop(gone.receiver);

        // when (操作):
        room.post(client("alive"), content("ping")).await.unwrap();

        // then (期待する結果):
        assert_eq!(room.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_history_is_capped_to_newest_messages() {
        // テスト項目: 履歴は上限件数を超えると古いものから捨てられる
        // given (前提条件):
        let config = RoomConfig {
            history_limit: Some(2),
            ..RoomConfig::default()
        };
        let room = create_test_room(config);

        // when (操作):
        for text in ["a", "b", "c"] {
            room.post(client("alice"), content(text)).await.unwrap();
        }

        // then (期待する結果):
        let texts: Vec<String> = room
            .history()
            .await
            .into_iter()
            .map(|m| m.content.into_string())
            .collect();
        assert_eq!(texts, vec!["b".to_string(), "c".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burn_tears_down_after_idle_timeout() {
        // テスト項目: 投稿がないまま idle_timeout が過ぎると Room は閉じ、全接続に通知される
        // given (前提条件):
        let room = create_test_room(config_with_idle(Duration::from_secs(1)));
        let mut a = room.join(client("alice")).await.unwrap();

        // when (操作):
        let fuse = tokio::spawn({
            let room = room.clone();
            async move { room.burn().await }
        });
        tokio::time::sleep(Duration::from_millis(1_100)).await;

        // then (期待する結果):
        assert!(fuse.is_finished());
        assert!(room.is_closed());
        assert!(a.closed.is_cancelled());
        assert!(a.receiver.recv().await.is_none());
        assert_eq!(room.connection_count().await, 0);
        assert_eq!(room.time_remaining().await, Duration::ZERO);
        assert!(matches!(
            room.join(client("bob")).await,
            Err(RoomError::NotFound(_))
        ));
        assert!(matches!(
            room.post(client("alice"), content("late")).await,
            Err(RoomError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_resets_fuse_before_original_deadline() {
        // テスト項目: 期限直前の投稿で期限が延長され、元の期限では消えない
        // given (前提条件):
        let idle = Duration::from_secs(10);
        let room = create_test_room(config_with_idle(idle));
        let fuse = tokio::spawn({
            let room = room.clone();
            async move { room.burn().await }
        });

        // when (操作): 期限の 1ms 前に投稿
        tokio::time::sleep(idle - Duration::from_millis(1)).await;
        room.post(client("alice"), content("still here")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;

        // then (期待する結果): 元の期限を過ぎても生きている
        assert!(!room.is_closed());
        assert!(!fuse.is_finished());
        assert!(room.time_remaining().await > idle - Duration::from_millis(5));

        // 延長後の期限を過ぎると消える
        tokio::time::sleep(idle).await;
        assert!(room.is_closed());
        assert!(fuse.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_stops_burn_immediately() {
        // テスト項目: close を呼ぶと期限前でも Room が閉じ、burn が終了する
        // given (前提条件):
        let room = create_test_room(config_with_idle(Duration::from_secs(3600)));
        let sub = room.join(client("alice")).await.unwrap();
        let fuse = tokio::spawn({
            let room = room.clone();
            async move { room.burn().await }
        });
        tokio::task::yield_now().await;

        // when (操作):
        room.close().await;
        fuse.await.unwrap();

        // then (期待する結果):
        assert!(room.is_closed());
        assert!(sub.closed.is_cancelled());
        assert_eq!(room.connection_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_after_deadline_does_not_revive_room() {
        // テスト項目: 期限を過ぎた後の投稿は、fuse タスクより先にロックを取っても NotFound になり Room は閉じる
        // given (前提条件): burn を動かさずに期限を過ぎさせる
        let room = create_test_room(config_with_idle(Duration::from_secs(1)));
        let sub = room.join(client("alice")).await.unwrap();
        tokio::time::advance(Duration::from_millis(1_500)).await;

        // when (操作):
        let result = room.post(client("alice"), content("too late")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RoomError::NotFound(_))));
        assert!(room.is_closed());
        assert!(sub.closed.is_cancelled());
        assert!(room.history().await.is_empty());
        assert_eq!(room.connection_count().await, 0);

        // 後から動いた burn もすぐに終わる
        room.burn().await;
        assert!(room.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_after_deadline_is_not_found() {
        // テスト項目: 期限を過ぎた後の join は NotFound になり、その場で Room が閉じる
        // given (前提条件):
        let room = create_test_room(config_with_idle(Duration::from_secs(1)));
        tokio::time::advance(Duration::from_millis(1_000)).await;

        // when (操作):
        let result = room.join(client("bob")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RoomError::NotFound(_))));
        assert!(room.is_closed());
        assert_eq!(room.time_remaining().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_message_timestamp_comes_from_clock() {
        // テスト項目: メッセージの created_at は注入した Clock の時刻になる
        // given (前提条件):
        let clock = Arc::new(FixedClock::new(1_000));
        let room = Room::new(
            RoomIdFactory::generate(),
            RoomConfig::default(),
            clock.clone(),
        )
        .unwrap();

        // when (操作):
        clock.advance(250);
        let message = room.post(client("alice"), content("hi")).await.unwrap();

        // then (期待する結果):
        assert_eq!(room.created_at(), Timestamp::new(1_000));
        assert_eq!(message.created_at, Timestamp::new(1_250));
    }
}
