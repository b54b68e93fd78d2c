//! Repository trait 定義
//!
//! プロセス全体の Room レジストリへのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use super::{error::RoomError, room::Room, value_object::RoomId};

/// Room Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 新しい Room を作成し、fuse を点火してレジストリに登録する
    async fn create_room(&self, idle_timeout: Duration) -> Result<RoomId, RoomError>;

    /// Room を取得（存在しない・期限切れの場合は `RoomError::NotFound`）
    async fn get_room(&self, id: &RoomId) -> Result<Arc<Room>, RoomError>;

    /// Room をレジストリから削除（冪等）。fuse の期限切れ時にのみ呼ばれる
    async fn remove_room(&self, id: &RoomId);

    /// 登録されている Room の数
    async fn count_rooms(&self) -> usize;

    /// 全ての Room を閉じる（サーバー停止時）
    async fn close_all(&self);
}
