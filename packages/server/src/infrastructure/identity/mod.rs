//! ClientIdentifier 実装

pub mod cookie;

pub use cookie::CookieClientIdentifier;
