//! Utilities shared between the fuse-chat binaries and their tests.

pub mod logger;
pub mod time;
