//! HTTP implementation of the chat backend

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{
    clean_translated_code, server_error, ApiError, ChatBackend, ChatReply, ChatRequest,
    ChatResponse, HealthStatus, ImagePrompt, ImagePromptRequest, ImagePromptResponse,
    TranslateRequest, TranslateResponse, DEFAULT_IMAGE_QUESTION,
};
use crate::storage::settings::AppSettings;
use crate::types::ImageAttachment;

/// Generation with model fallbacks can take a while server-side
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Talks to the chat server over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self, ApiError> {
        Self::new(settings.server_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        decode(response).await
    }

    /// Check that the server is up and has an API key configured.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint("/api/health");
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }
}

/// Parse a JSON body. Error statuses usually still carry a JSON body with
/// an `error` field, so the status is only reported when parsing fails.
async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    match serde_json::from_str::<R>(&text) {
        Ok(value) => Ok(value),
        Err(e) if status.is_success() => Err(ApiError::InvalidResponse(e.to_string())),
        Err(_) => Err(ApiError::Status {
            status: status.as_u16(),
            body: text,
        }),
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(
        &self,
        message: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<ChatReply, ApiError> {
        let message = message.trim();
        if message.is_empty() && image.is_none() {
            return Err(ApiError::EmptyRequest);
        }
        let message = if message.is_empty() {
            DEFAULT_IMAGE_QUESTION
        } else {
            message
        };

        let request = ChatRequest {
            message,
            image: image.map(|img| img.data_url.as_str()),
        };
        let response: ChatResponse = self.post("/api/chat", &request).await?;

        match response.response {
            Some(text) if response.success => {
                if let Some(model) = &response.model_used {
                    tracing::debug!("Chat reply from {}", model);
                }
                Ok(ChatReply {
                    text,
                    model_used: response.model_used,
                })
            }
            _ => {
                if let Some(details) = &response.technical_details {
                    tracing::warn!("Chat request failed: {}", details);
                }
                Err(server_error(response.error, response.suggestion))
            }
        }
    }

    async fn translate_code(
        &self,
        code: &str,
        target_language: &str,
    ) -> Result<String, ApiError> {
        if code.trim().is_empty() || target_language.trim().is_empty() {
            return Err(ApiError::EmptyRequest);
        }

        let response: TranslateResponse = self
            .post(
                "/api/translate-code",
                &TranslateRequest {
                    code,
                    target_language,
                },
            )
            .await?;

        match response.translated_code {
            Some(translated) if response.success => Ok(clean_translated_code(&translated)),
            _ => Err(server_error(response.error, response.suggestion)),
        }
    }

    async fn generate_image_prompt(
        &self,
        prompt: &str,
        style: &str,
    ) -> Result<ImagePrompt, ApiError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ApiError::EmptyRequest);
        }

        let response: ImagePromptResponse = self
            .post("/api/generate-image", &ImagePromptRequest { prompt, style })
            .await?;

        match response.response {
            Some(text) if response.success => Ok(ImagePrompt {
                text,
                original_prompt: response
                    .original_prompt
                    .unwrap_or_else(|| prompt.to_string()),
                style: response.style.unwrap_or_else(|| style.to_string()),
                platforms: response.platforms.into_values().collect(),
                message: response.message,
            }),
            _ => Err(server_error(response.error, None)),
        }
    }
}
