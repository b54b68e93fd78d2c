//! HTTP API response DTOs

use serde::{Deserialize, Serialize};

/// `GET /c/{room_id}/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStatusDto {
    pub room_id: String,
    pub connections: usize,
    pub age_secs: u64,
    pub time_remaining_secs: u64,
    /// RFC 3339 (JST)
    pub created_at: String,
}

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub rooms: usize,
}

/// `POST /c/{room_id}` のフォーム
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMessageForm {
    #[serde(default)]
    pub message: String,
}
