//! Friction Library
//!
//! Core of the Friction chat client: the message formatter plus chat
//! history, settings, the backend client and transcript rendering.

pub mod api;
pub mod format;
pub mod session;
pub mod storage;
pub mod transcript;
pub mod types;
pub mod typing;

pub use format::format_message;
