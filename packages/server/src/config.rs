//! サーバー全体の設定

use std::time::Duration;

use crate::domain::RoomConfig;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(15);
/// DeliveryLoop と SSE レスポンスボディの間のバッファ
pub const DEFAULT_SSE_BUFFER: usize = 16;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 新しく作る Room の設定
    pub room: RoomConfig,
    /// SSE の keep-alive コメントの送信間隔
    pub keep_alive: Duration,
    pub sse_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            room: RoomConfig::default(),
            keep_alive: DEFAULT_KEEP_ALIVE,
            sse_buffer: DEFAULT_SSE_BUFFER,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
