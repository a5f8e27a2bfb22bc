//! Shared type definitions
//!
//! This module contains the data types shared by storage, the API client and
//! the transcript renderer.

pub mod attachment;
pub mod message;

pub use attachment::{AttachmentError, ImageAttachment};
pub use message::{ChatMessage, Sender};
