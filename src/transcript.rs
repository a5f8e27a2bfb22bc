//! Transcript and sidebar HTML
//!
//! Message bubbles wrap the formatter output; the sidebar lists past chats.
//! Everything is returned as HTML fragments for the caller to insert.

use uuid::Uuid;

use crate::format::escape::{escape_attribute, escape_html};
use crate::format::format_message;
use crate::storage::history::{Chat, ChatHistory};
use crate::types::{ImageAttachment, Sender};

const CHAT_ICON: &str = concat!(
    r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor">"#,
    r#"<path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/>"#,
    r#"</svg>"#
);

/// Fresh DOM id for a message bubble.
pub fn message_id() -> String {
    format!("msg-{}", Uuid::new_v4().simple())
}

fn bubble(id: &str, sender: Sender, content: &str) -> String {
    format!(
        r#"<div class="message {}" id="{}"><div class="message-avatar">{}</div><div class="message-content">{}</div></div>"#,
        sender.as_class(),
        escape_attribute(id),
        sender.avatar(),
        content
    )
}

/// A complete message bubble with formatted content.
pub fn render_message(id: &str, sender: Sender, text: &str) -> String {
    bubble(id, sender, &format_message(text))
}

/// A bubble showing a partially typed reply as plain text.
pub fn render_typing_frame(id: &str, sender: Sender, frame: &str) -> String {
    bubble(id, sender, &format!("<p>{}</p>", escape_html(frame)))
}

/// The attached image, shown under the user's message.
pub fn render_image_message(image: &ImageAttachment) -> String {
    format!(
        r#"<div class="message user-message"><div class="message-content"><img class="message-image" src="{}" alt="{}"></div></div>"#,
        escape_attribute(&image.data_url),
        escape_attribute(&image.name)
    )
}

/// Placeholder bubble shown while waiting for the backend.
pub fn render_loading(id: &str) -> String {
    bubble(
        id,
        Sender::Assistant,
        r#"<div class="loading-dots"><div class="loading-dot"></div><div class="loading-dot"></div><div class="loading-dot"></div></div>"#,
    )
}

/// Every message of a stored chat, oldest first.
pub fn render_chat(chat: &Chat) -> String {
    chat.messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let id = format!("msg-{}-{}", chat.id, index);
            render_message(&id, message.sender, &message.text)
        })
        .collect()
}

/// Sidebar list of past chats, current chat marked `active`.
pub fn render_history_list(history: &ChatHistory) -> String {
    if history.is_empty() {
        return r#"<div class="chat-history-empty">No chats yet</div>"#.to_string();
    }

    let current = history.current_chat_id();
    history
        .chats()
        .iter()
        .map(|chat| {
            let class = if current == Some(chat.id.as_str()) {
                "chat-history-item active"
            } else {
                "chat-history-item"
            };
            format!(
                r#"<div class="{}" data-chat-id="{}">{}<span class="chat-title">{}</span></div>"#,
                class,
                escape_attribute(&chat.id),
                CHAT_ICON,
                escape_html(&chat.title)
            )
        })
        .collect()
}
