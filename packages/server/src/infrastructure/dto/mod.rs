//! Data Transfer Objects (DTOs) for the chat application.
//!
//! DTOs are organized by protocol:
//! - `http`: HTTP API response DTOs
//! - `cookie`: identity cookie payload

pub mod conversion;
pub mod cookie;
pub mod http;
