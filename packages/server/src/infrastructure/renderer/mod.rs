//! MessageRenderer 実装

pub mod html;

pub use html::HtmlMessageRenderer;
