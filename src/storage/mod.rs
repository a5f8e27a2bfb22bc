//! Persistent storage
//!
//! This module handles persistence of the chat history and user settings.
//! Everything lives as pretty-printed JSON in the platform data directory.

pub mod history;
pub mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not determine a data directory for this platform")]
    NoDataDir,
    #[error("Chat not found: {0}")]
    ChatNotFound(String),
}

/// Get the application data directory
pub fn get_data_dir() -> Result<PathBuf, StorageError> {
    ProjectDirs::from("ai", "Friction", "Friction")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(StorageError::NoDataDir)
}

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Serialize to pretty JSON, creating parent directories as needed.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
