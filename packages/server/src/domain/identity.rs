//! ClientIdentifier trait 定義
//!
//! リクエストからクライアント（ID・表示名）を決める外部の協調者。
//! Cookie のエンコード方式はドメイン層からは見えない。

use super::entity::Client;

/// 識別結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub client: Client,
    /// 新しい識別子を発行した場合にレスポンスへ付ける `Set-Cookie` の値
    pub set_cookie: Option<String>,
}

pub trait ClientIdentifier: Send + Sync {
    /// `cookie_header` はリクエストの `Cookie` ヘッダの値（なければ `None`）
    fn identify(&self, cookie_header: Option<&str>) -> Identification;
}
