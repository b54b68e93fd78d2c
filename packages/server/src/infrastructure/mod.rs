//! Infrastructure layer
//!
//! ドメイン層が定義する trait（`RoomRepository`, `EventSink`, `MessageRenderer`,
//! `ClientIdentifier`）の具体的な実装と、HTTP / Cookie 用の DTO。

pub mod dto;
pub mod event_sink;
pub mod identity;
pub mod renderer;
pub mod repository;
