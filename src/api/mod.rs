//! Chat backend API
//!
//! Typed access to the remote endpoints the chat UI talks to:
//! `/api/chat`, `/api/translate-code`, `/api/generate-image` and
//! `/api/health`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ImageAttachment;

pub mod cleanup;
pub mod http;

pub use cleanup::clean_translated_code;
pub use http::HttpBackend;

/// Question sent when the user attaches an image without typing anything
pub const DEFAULT_IMAGE_QUESTION: &str = "What is in this image? Describe it in detail.";

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("{message}")]
    Server {
        message: String,
        suggestion: Option<String>,
    },
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Nothing to send")]
    EmptyRequest,
}

impl ApiError {
    /// Retry hint supplied by the server, if any.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::Server { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}

/// Operations the chat UI needs from a backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a user message (and optional image), returning the AI reply.
    async fn chat(
        &self,
        message: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<ChatReply, ApiError>;

    /// Translate `code` into `target_language`, returning bare code.
    async fn translate_code(&self, code: &str, target_language: &str)
        -> Result<String, ApiError>;

    /// Turn a short image idea into an engineered prompt in `style`.
    async fn generate_image_prompt(&self, prompt: &str, style: &str)
        -> Result<ImagePrompt, ApiError>;
}

/// A successful chat reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Raw reply text, to be passed through the formatter
    pub text: String,
    /// Model that produced the reply, when reported
    pub model_used: Option<String>,
}

/// One image generation platform suggested with a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    pub url: String,
    pub best_for: String,
}

/// An engineered image-generation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePrompt {
    /// Markdown prompt text, ready for the formatter
    pub text: String,
    pub original_prompt: String,
    pub style: String,
    /// Platforms the prompt is meant for, sorted by key
    pub platforms: Vec<Platform>,
    /// Status line shown above the prompt
    pub message: Option<String>,
}

impl ImagePrompt {
    /// Markdown shown in the transcript: the prompt followed by one entry
    /// per platform.
    pub fn to_markdown(&self) -> String {
        let mut markdown = format!(
            "## 🎨 Enhanced Image Prompt\n\n{}\n\n---\n\n### 🚀 Generate Your Image:\n\n",
            self.text
        );
        for platform in &self.platforms {
            markdown.push_str(&format!("**{}** - {}\n", platform.name, platform.best_for));
            markdown.push_str(&format!("[Open {}]({})\n\n", platform.name, platform.url));
        }
        markdown
    }
}

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub api_configured: bool,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.api_configured
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    pub response: Option<String>,
    pub model_used: Option<String>,
    pub error: Option<String>,
    pub technical_details: Option<String>,
    pub suggestion: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslateRequest<'a> {
    pub code: &'a str,
    pub target_language: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TranslateResponse {
    #[serde(default)]
    pub success: bool,
    pub translated_code: Option<String>,
    pub error: Option<String>,
    pub suggestion: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImagePromptRequest<'a> {
    pub prompt: &'a str,
    pub style: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImagePromptResponse {
    #[serde(default)]
    pub success: bool,
    pub response: Option<String>,
    pub original_prompt: Option<String>,
    pub style: Option<String>,
    #[serde(default)]
    pub platforms: std::collections::BTreeMap<String, Platform>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Error for a response that reported failure or carried no payload.
pub(crate) fn server_error(error: Option<String>, suggestion: Option<String>) -> ApiError {
    ApiError::Server {
        message: error.unwrap_or_else(|| "Unknown error".to_string()),
        suggestion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_prompt_markdown_lists_platforms() {
        let prompt = ImagePrompt {
            text: "A red fox at dawn".to_string(),
            original_prompt: "fox".to_string(),
            style: "artistic".to_string(),
            platforms: vec![Platform {
                name: "Midjourney".to_string(),
                url: "https://www.midjourney.com/".to_string(),
                best_for: "Artistic, creative styles".to_string(),
            }],
            message: None,
        };

        assert_eq!(
            prompt.to_markdown(),
            "## 🎨 Enhanced Image Prompt\n\nA red fox at dawn\n\n---\n\n\
             ### 🚀 Generate Your Image:\n\n\
             **Midjourney** - Artistic, creative styles\n\
             [Open Midjourney](https://www.midjourney.com/)\n\n"
        );
    }

    #[test]
    fn test_server_error_defaults_message() {
        let err = server_error(None, Some("Retry later.".to_string()));
        assert_eq!(err.to_string(), "Unknown error");
        assert_eq!(err.suggestion(), Some("Retry later."));
    }
}
