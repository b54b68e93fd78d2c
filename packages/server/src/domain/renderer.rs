//! MessageRenderer trait 定義
//!
//! メッセージ・ページの表示用バイト列の生成は外部の協調者として扱う。
//! ドメイン層は「誰が見るか（投稿者本人かどうか）」だけを渡す。

use super::{
    entity::{ChatMessage, Client},
    error::RenderError,
    room::RoomSnapshot,
};

#[cfg_attr(test, mockall::automock)]
pub trait MessageRenderer: Send + Sync {
    /// 1 件のメッセージを描画する（SSE の `data` になる）
    fn render_message(
        &self,
        message: &ChatMessage,
        viewer_is_author: bool,
    ) -> Result<String, RenderError>;

    /// チャットページを描画する
    fn render_room_page(
        &self,
        room: &RoomSnapshot,
        viewer: &Client,
    ) -> Result<String, RenderError>;
}
