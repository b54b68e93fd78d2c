//! Domain layer for the chat application.
//!
//! Room のライフサイクル、接続の管理、fan-out、fuse による期限切れを扱う。
//! HTTP・Cookie・HTML といった外側の関心事は trait として定義し、
//! 実装は Infrastructure 層に置く。

pub mod delivery;
pub mod entity;
pub mod error;
pub mod fuse;
pub mod identity;
pub mod renderer;
pub mod repository;
pub mod room;
pub mod value_object;

pub use delivery::{DeliveryLoop, DeliveryOutcome, EventSink, Frame};
pub use entity::{ChatMessage, Client};
pub use error::{RenderError, RoomError, TransportError, ValueObjectError};
pub use fuse::ExpiryFuse;
pub use identity::{ClientIdentifier, Identification};
pub use renderer::MessageRenderer;
pub use repository::RoomRepository;
pub use room::{FanOut, Room, RoomConfig, RoomSnapshot, Subscription};
pub use value_object::{
    ClientId, ClientName, ConnectionId, MessageContent, RoomId, RoomIdFactory, Timestamp,
};
