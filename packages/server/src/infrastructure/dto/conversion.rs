//! Conversion logic between DTOs and domain entities.

use fuse_chat_shared::time::timestamp_to_jst_rfc3339;
use uuid::Uuid;

use crate::domain::{Client, ClientId, ClientName, RoomSnapshot, ValueObjectError};
use crate::infrastructure::dto::{cookie::ClientCookieDto, http::RoomStatusDto};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<ClientCookieDto> for Client {
    type Error = ValueObjectError;

    /// Cookie の ID は UUID でなければならない
    fn try_from(dto: ClientCookieDto) -> Result<Self, Self::Error> {
        if Uuid::parse_str(&dto.id).is_err() {
            return Err(ValueObjectError::InvalidClientId(dto.id));
        }
        Ok(Self {
            id: ClientId::new(dto.id)?,
            name: ClientName::new(dto.name)?,
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Client> for ClientCookieDto {
    fn from(model: &Client) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            name: model.name.as_str().to_string(),
        }
    }
}

impl From<&RoomSnapshot> for RoomStatusDto {
    fn from(model: &RoomSnapshot) -> Self {
        Self {
            room_id: model.id.as_str().to_string(),
            connections: model.connections,
            age_secs: model.age.as_secs(),
            time_remaining_secs: model.time_remaining.as_secs(),
            created_at: timestamp_to_jst_rfc3339(model.created_at.value()),
        }
    }
}
