//! fuse-chat server library
//!
//! 無操作が続くと燃え尽きるチャットルームを、axum と Server-Sent Events で提供する。

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
