//! Settings storage
//!
//! Manages persistence of user preferences.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::{get_data_dir, read_json, write_json, StorageError};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_TYPING_DELAY_MS: u64 = 20;
pub const MAX_TYPING_DELAY_MS: u64 = 1000;
pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";
pub const DEFAULT_IMAGE_STYLE: &str = "professional";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Base URL of the chat backend
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Delay between revealed characters of an AI reply
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
    /// Read AI replies aloud
    #[serde(default)]
    pub tts_enabled: bool,
    /// BCP 47 tag used for speech input and output
    #[serde(default = "default_speech_language")]
    pub speech_language: String,
    /// Style hint sent with image prompt requests
    #[serde(default = "default_image_style")]
    pub image_style: String,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_typing_delay_ms() -> u64 {
    DEFAULT_TYPING_DELAY_MS
}

fn default_speech_language() -> String {
    DEFAULT_SPEECH_LANGUAGE.to_string()
}

fn default_image_style() -> String {
    DEFAULT_IMAGE_STYLE.to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            typing_delay_ms: DEFAULT_TYPING_DELAY_MS,
            tts_enabled: false,
            speech_language: default_speech_language(),
            image_style: default_image_style(),
        }
    }
}

impl AppSettings {
    /// Validate settings values
    ///
    /// Out-of-range or empty values are replaced by their defaults.
    pub fn validate(&mut self) {
        self.typing_delay_ms = self.typing_delay_ms.min(MAX_TYPING_DELAY_MS);

        let url = self.server_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            tracing::warn!("Invalid server URL {:?}, using default", self.server_url);
            self.server_url = default_server_url();
        } else {
            self.server_url = url.trim_end_matches('/').to_string();
        }

        if self.speech_language.trim().is_empty() {
            self.speech_language = default_speech_language();
        }

        if self.image_style.trim().is_empty() {
            self.image_style = default_image_style();
        }
    }

    /// Typing delay as a `Duration`.
    pub fn typing_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.typing_delay_ms)
    }
}

/// Get the settings file path
fn get_settings_path() -> Result<PathBuf, StorageError> {
    Ok(get_data_dir()?.join("settings.json"))
}

/// Load settings from disk
///
/// Returns default settings if the file doesn't exist or is corrupted
pub fn load_settings() -> AppSettings {
    match get_settings_path() {
        Ok(path) => load_settings_from(&path),
        Err(e) => {
            tracing::warn!("Failed to locate settings, using defaults: {}", e);
            AppSettings::default()
        }
    }
}

/// Load settings from a specific file, falling back to defaults.
pub fn load_settings_from(path: &Path) -> AppSettings {
    if !path.exists() {
        tracing::info!("Settings file not found, using defaults");
        return AppSettings::default();
    }

    match read_json::<AppSettings>(path) {
        Ok(mut settings) => {
            settings.validate();
            tracing::debug!("Loaded settings from disk");
            settings
        }
        Err(e) => {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            AppSettings::default()
        }
    }
}

/// Save settings to disk
pub fn save_settings(settings: &AppSettings) -> Result<(), StorageError> {
    save_settings_to(&get_settings_path()?, settings)
}

/// Save settings to a specific file.
pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), StorageError> {
    write_json(path, settings)?;
    tracing::debug!("Saved settings to disk");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.server_url, "http://localhost:5000");
        assert_eq!(settings.typing_delay_ms, 20);
        assert!(!settings.tts_enabled);
        assert_eq!(settings.speech_language, "en-US");
        assert_eq!(settings.image_style, "professional");
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = AppSettings::default();

        settings.typing_delay_ms = 50_000;
        settings.validate();
        assert_eq!(settings.typing_delay_ms, MAX_TYPING_DELAY_MS);

        settings.server_url = "localhost:5000".to_string();
        settings.validate();
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);

        settings.server_url = "https://chat.example.com/".to_string();
        settings.validate();
        assert_eq!(settings.server_url, "https://chat.example.com");

        settings.speech_language = "  ".to_string();
        settings.image_style = String::new();
        settings.validate();
        assert_eq!(settings.speech_language, DEFAULT_SPEECH_LANGUAGE);
        assert_eq!(settings.image_style, DEFAULT_IMAGE_STYLE);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"tts_enabled": true}"#).unwrap();
        assert!(settings.tts_enabled);
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
        assert_eq!(settings.typing_delay_ms, DEFAULT_TYPING_DELAY_MS);
    }

    #[test]
    fn test_settings_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = AppSettings {
            tts_enabled: true,
            speech_language: "hi-IN".to_string(),
            ..AppSettings::default()
        };
        save_settings_to(&path, &settings).unwrap();

        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn test_missing_or_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(load_settings_from(&path), AppSettings::default());

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_settings_from(&path), AppSettings::default());
    }
}
