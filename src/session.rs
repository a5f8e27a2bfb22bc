//! Chat session
//!
//! Ties the backend, the chat history and the renderer together: sending a
//! message records it, asks the backend for a reply and returns the HTML
//! bubbles to append to the transcript.

use std::sync::Arc;

use crate::api::{ApiError, ChatBackend};
use crate::storage::history::ChatHistory;
use crate::storage::settings::AppSettings;
use crate::storage::StorageError;
use crate::transcript::{
    message_id, render_chat, render_history_list, render_image_message, render_message,
    render_typing_frame,
};
use crate::types::{ImageAttachment, Sender};
use crate::typing::type_text;

/// Shown as the user's message when only an image was sent
pub const IMAGE_ONLY_LABEL: &str = "Analyze this image";

/// Rendered result of one send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub chat_id: String,
    /// The user's bubble
    pub user_html: String,
    /// The attached image, if one was sent
    pub image_html: Option<String>,
    /// DOM id of the reply bubble
    pub reply_id: String,
    /// The assistant's reply, or an error bubble
    pub reply_html: String,
    /// Raw reply text; `None` when the backend failed
    pub reply_text: Option<String>,
    /// Whether the reply should be read aloud
    pub speak: bool,
}

/// A translated code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub code: String,
    /// New class for the `<code>` element, e.g. `language-javascript`
    pub language_class: String,
}

pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    history: ChatHistory,
    settings: AppSettings,
    attachment: Option<ImageAttachment>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>, history: ChatHistory, settings: AppSettings) -> Self {
        Self {
            backend,
            history,
            settings,
            attachment: None,
        }
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AppSettings {
        &mut self.settings
    }

    /// Attach an image to the next message, replacing any previous one.
    pub fn attach_image(&mut self, image: ImageAttachment) {
        tracing::debug!("Image attached: {}", image.name);
        self.attachment = Some(image);
    }

    pub fn remove_attachment(&mut self) -> Option<ImageAttachment> {
        self.attachment.take()
    }

    pub fn pending_attachment(&self) -> Option<&ImageAttachment> {
        self.attachment.as_ref()
    }

    /// Leave the current chat; the next message starts a new one.
    pub fn new_chat(&mut self) {
        self.history.clear_current();
    }

    /// Switch to a stored chat and render its transcript.
    pub fn open_chat(&mut self, chat_id: &str) -> Option<String> {
        self.history.load_chat(chat_id).map(render_chat)
    }

    pub fn delete_chat(&mut self, chat_id: &str) -> bool {
        self.history.delete_chat(chat_id)
    }

    pub fn sidebar_html(&self) -> String {
        render_history_list(&self.history)
    }

    /// Send a message and wait for the reply.
    ///
    /// Returns `Ok(None)` when there is neither text nor an image. Backend
    /// failures become an error bubble rather than an `Err`; only history
    /// bookkeeping can fail. The attachment is consumed by every send.
    pub async fn send(&mut self, text: &str) -> Result<Option<SendOutcome>, StorageError> {
        let text = text.trim();
        if text.is_empty() && self.attachment.is_none() {
            return Ok(None);
        }

        let shown = if text.is_empty() { IMAGE_ONLY_LABEL } else { text };
        let chat_id = self.record_user_message(shown)?;

        let image = self.attachment.take();
        let user_html = render_message(&message_id(), Sender::User, shown);
        let image_html = image.as_ref().map(render_image_message);

        let result = self
            .backend
            .chat(text, image.as_ref())
            .await
            .map(|reply| reply.text);
        let outcome = self.finish_reply(chat_id, user_html, image_html, result, "Error")?;
        Ok(Some(outcome))
    }

    /// Ask the backend for an engineered image prompt in the configured
    /// style and render it as a reply listing the generation platforms.
    ///
    /// Returns `Ok(None)` for a blank prompt. Failures become an error
    /// bubble, as in [`ChatSession::send`].
    pub async fn generate_image(
        &mut self,
        prompt: &str,
    ) -> Result<Option<SendOutcome>, StorageError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(None);
        }

        let style = self.settings.image_style.clone();
        let shown = format!("🎨 Generate image: {} ({} style)", prompt, style);
        let chat_id = self.record_user_message(&shown)?;
        let user_html = render_message(&message_id(), Sender::User, &shown);

        let result = self
            .backend
            .generate_image_prompt(prompt, &style)
            .await
            .map(|image_prompt| image_prompt.to_markdown());
        let outcome = self.finish_reply(chat_id, user_html, None, result, "❌ Error")?;
        Ok(Some(outcome))
    }

    /// Play the typed-in reveal of a reply.
    ///
    /// `sink` receives the reply bubble once per typed character at the
    /// configured typing delay, then the fully formatted bubble. Error
    /// bubbles are passed through without animation. Returns the number of
    /// typed frames.
    pub async fn type_reply<F>(&self, outcome: &SendOutcome, mut sink: F) -> usize
    where
        F: FnMut(String),
    {
        let frames = match outcome.reply_text.as_deref() {
            Some(text) => {
                type_text(text, self.settings.typing_delay(), |frame| {
                    sink(render_typing_frame(&outcome.reply_id, Sender::Assistant, frame))
                })
                .await
            }
            None => 0,
        };
        sink(outcome.reply_html.clone());
        frames
    }

    /// Append a user message to the current chat, starting one if needed.
    fn record_user_message(&mut self, text: &str) -> Result<String, StorageError> {
        let chat_id = match self.history.current_chat_id() {
            Some(id) => id.to_string(),
            None => self.history.create_new_chat(text),
        };
        self.history.update_chat(&chat_id, text, Sender::User)?;
        Ok(chat_id)
    }

    /// Record a successful reply and render it, or render the error.
    fn finish_reply(
        &mut self,
        chat_id: String,
        user_html: String,
        image_html: Option<String>,
        result: Result<String, ApiError>,
        error_prefix: &str,
    ) -> Result<SendOutcome, StorageError> {
        let reply_id = message_id();
        let (reply_html, reply_text) = match result {
            Ok(text) => {
                self.history
                    .update_chat(&chat_id, &text, Sender::Assistant)?;
                let html = render_message(&reply_id, Sender::Assistant, &text);
                (html, Some(text))
            }
            Err(e) => {
                tracing::error!("Request failed: {}", e);
                let text = error_text(error_prefix, &e);
                let html = render_message(&reply_id, Sender::Assistant, &text);
                (html, None)
            }
        };

        let speak = self.settings.tts_enabled && reply_text.is_some();
        Ok(SendOutcome {
            chat_id,
            user_html,
            image_html,
            reply_id,
            reply_html,
            reply_text,
            speak,
        })
    }

    /// Translate the body of a code block into `target_language`.
    pub async fn translate(
        &self,
        code: &str,
        target_language: &str,
    ) -> Result<Translation, ApiError> {
        let code = self.backend.translate_code(code, target_language).await?;
        Ok(Translation {
            code,
            language_class: format!("language-{}", target_language.to_lowercase()),
        })
    }
}

fn error_text(prefix: &str, error: &ApiError) -> String {
    match error.suggestion() {
        Some(suggestion) => format!("{}: {}\n\n{}", prefix, error, suggestion),
        None => format!("{}: {}", prefix, error),
    }
}
