//! Chat history storage
//!
//! Keeps the list of past chats shown in the sidebar. Newest chats come
//! first. The file holds a bare JSON array of chats.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{get_data_dir, read_json, write_json, StorageError};
use crate::types::{ChatMessage, Sender};

/// Titles longer than this many characters are cut and suffixed with `...`
pub const TITLE_MAX_CHARS: usize = 40;

/// Title of a chat created before any message was sent
pub const UNTITLED_CHAT: &str = "New chat";

/// A single chat in the sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// All chats plus the one currently open
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    chats: Vec<Chat>,
    #[serde(skip)]
    current_chat_id: Option<String>,
}

/// Sidebar title for a chat whose first message is `message`.
pub fn generate_chat_title(message: &str) -> String {
    let mut chars = message.chars();
    let mut title: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        title.push_str("...");
    }
    title
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chats, newest first.
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn current_chat_id(&self) -> Option<&str> {
        self.current_chat_id.as_deref()
    }

    pub fn current_chat(&self) -> Option<&Chat> {
        let id = self.current_chat_id.as_deref()?;
        self.get(id)
    }

    pub fn get(&self, chat_id: &str) -> Option<&Chat> {
        self.chats.iter().find(|chat| chat.id == chat_id)
    }

    /// Start a new chat at the top of the list and make it current.
    pub fn create_new_chat(&mut self, first_message: &str) -> String {
        let now = Utc::now();
        let id = format!("chat_{}", Uuid::new_v4().simple());
        let title = if first_message.is_empty() {
            UNTITLED_CHAT.to_string()
        } else {
            generate_chat_title(first_message)
        };

        self.chats.insert(
            0,
            Chat {
                id: id.clone(),
                title,
                messages: Vec::new(),
                created_at: now,
                updated_at: now,
            },
        );
        self.current_chat_id = Some(id.clone());

        tracing::debug!("Created chat {}", id);
        id
    }

    /// Append a message to a chat.
    ///
    /// The first user message of a chat also becomes its title.
    pub fn update_chat(
        &mut self,
        chat_id: &str,
        text: &str,
        sender: Sender,
    ) -> Result<(), StorageError> {
        let chat = self
            .chats
            .iter_mut()
            .find(|chat| chat.id == chat_id)
            .ok_or_else(|| StorageError::ChatNotFound(chat_id.to_string()))?;

        let message = ChatMessage::new(sender, text);
        chat.updated_at = message.timestamp;
        chat.messages.push(message);

        if sender == Sender::User && chat.messages.len() == 1 {
            chat.title = generate_chat_title(text);
        }

        Ok(())
    }

    /// Make `chat_id` the current chat and return it.
    pub fn load_chat(&mut self, chat_id: &str) -> Option<&Chat> {
        let index = self.chats.iter().position(|chat| chat.id == chat_id)?;
        self.current_chat_id = Some(chat_id.to_string());
        self.chats.get(index)
    }

    /// Remove a chat. Returns `false` if there was no such chat.
    pub fn delete_chat(&mut self, chat_id: &str) -> bool {
        let before = self.chats.len();
        self.chats.retain(|chat| chat.id != chat_id);
        if self.current_chat_id.as_deref() == Some(chat_id) {
            self.current_chat_id = None;
        }
        self.chats.len() != before
    }

    /// Forget which chat is open; the next message starts a new one.
    pub fn clear_current(&mut self) {
        self.current_chat_id = None;
    }
}

/// Get the history file path
fn get_history_path() -> Result<PathBuf, StorageError> {
    Ok(get_data_dir()?.join("history.json"))
}

/// Load the chat history from disk
///
/// Returns an empty history if the file doesn't exist or is corrupted
pub fn load_history() -> ChatHistory {
    match get_history_path() {
        Ok(path) => load_history_from(&path),
        Err(e) => {
            tracing::warn!("Failed to locate chat history: {}", e);
            ChatHistory::default()
        }
    }
}

/// Load the chat history from a specific file.
pub fn load_history_from(path: &Path) -> ChatHistory {
    if !path.exists() {
        return ChatHistory::default();
    }

    match read_json::<ChatHistory>(path) {
        Ok(history) => {
            tracing::debug!("Loaded {} chats from disk", history.chats.len());
            history
        }
        Err(e) => {
            tracing::warn!("Failed to load chat history, starting empty: {}", e);
            ChatHistory::default()
        }
    }
}

/// Save the chat history to disk
pub fn save_history(history: &ChatHistory) -> Result<(), StorageError> {
    save_history_to(&get_history_path()?, history)
}

/// Save the chat history to a specific file.
pub fn save_history_to(path: &Path, history: &ChatHistory) -> Result<(), StorageError> {
    write_json(path, history)?;
    tracing::debug!("Saved {} chats to disk", history.chats.len());
    Ok(())
}
