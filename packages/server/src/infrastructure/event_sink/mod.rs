//! EventSink 実装
//!
//! - `sse`: Server-Sent Events のレスポンスボディへ流す実装

pub mod sse;

pub use sse::{SseEventSink, SseStream};
