//! Image attachments
//!
//! Images are sent to the chat endpoint inline, as `data:` URLs.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest image accepted for upload (5 MiB)
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Attachment errors
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Image is empty")]
    Empty,
    #[error("Image is too large ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}

/// An image attached to the next outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// Original file name, shown as alt text
    pub name: String,
    /// MIME type, always `image/*`
    pub mime_type: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

/// MIME type for a supported image file name.
fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime)
}

impl ImageAttachment {
    /// Encode raw file bytes. The type is taken from the file extension.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, AttachmentError> {
        let name = name.into();
        if bytes.is_empty() {
            return Err(AttachmentError::Empty);
        }
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                size: bytes.len(),
                max: MAX_ATTACHMENT_BYTES,
            });
        }
        let mime_type =
            mime_for_name(&name).ok_or_else(|| AttachmentError::UnsupportedType(name.clone()))?;

        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));
        tracing::debug!("Attached image {} ({} bytes)", name, bytes.len());

        Ok(Self {
            name,
            mime_type: mime_type.to_string(),
            data_url,
        })
    }

    /// Wrap an existing `data:image/...;base64,` URL, e.g. the output of the
    /// image editor.
    pub fn from_data_url(
        name: impl Into<String>,
        data_url: impl Into<String>,
    ) -> Result<Self, AttachmentError> {
        let data_url = data_url.into();
        let (header, payload) = data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or_else(|| AttachmentError::InvalidDataUrl("missing data: header".to_string()))?;

        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| AttachmentError::InvalidDataUrl("not base64 encoded".to_string()))?;
        if !mime_type.starts_with("image/") {
            return Err(AttachmentError::UnsupportedType(mime_type.to_string()));
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| AttachmentError::InvalidDataUrl(e.to_string()))?;
        if bytes.is_empty() {
            return Err(AttachmentError::Empty);
        }
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                size: bytes.len(),
                max: MAX_ATTACHMENT_BYTES,
            });
        }

        Ok(Self {
            name: name.into(),
            mime_type: mime_type.to_string(),
            data_url,
        })
    }

    /// Base64 payload without the `data:` header.
    pub fn payload(&self) -> &str {
        self.data_url
            .split_once(',')
            .map_or(self.data_url.as_str(), |(_, payload)| payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

    #[test]
    fn test_from_bytes_builds_data_url() {
        let image = ImageAttachment::from_bytes("diagram.PNG", PNG_MAGIC).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data_url, "data:image/png;base64,iVBORw==");
        assert_eq!(image.payload(), "iVBORw==");
    }

    #[test]
    fn test_jpeg_extensions() {
        let a = ImageAttachment::from_bytes("a.jpg", b"x").unwrap();
        let b = ImageAttachment::from_bytes("b.jpeg", b"x").unwrap();
        assert_eq!(a.mime_type, "image/jpeg");
        assert_eq!(b.mime_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(matches!(
            ImageAttachment::from_bytes("a.png", b""),
            Err(AttachmentError::Empty)
        ));
        assert!(matches!(
            ImageAttachment::from_bytes("notes.txt", b"hello"),
            Err(AttachmentError::UnsupportedType(_))
        ));
        assert!(matches!(
            ImageAttachment::from_bytes("noext", b"hello"),
            Err(AttachmentError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_size_limit_boundary() {
        assert_eq!(MAX_ATTACHMENT_BYTES, 5 * 1024 * 1024);

        let at_limit = vec![0u8; MAX_ATTACHMENT_BYTES];
        assert!(ImageAttachment::from_bytes("max.png", &at_limit).is_ok());

        let over = vec![0u8; MAX_ATTACHMENT_BYTES + 1];
        assert!(matches!(
            ImageAttachment::from_bytes("big.png", &over),
            Err(AttachmentError::TooLarge { size, max })
                if size == MAX_ATTACHMENT_BYTES + 1 && max == MAX_ATTACHMENT_BYTES
        ));
    }

    #[test]
    fn test_from_data_url() {
        let image =
            ImageAttachment::from_data_url("edited.png", "data:image/png;base64,iVBORw==").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.payload(), "iVBORw==");
    }

    #[test]
    fn test_from_data_url_rejects_garbage() {
        assert!(matches!(
            ImageAttachment::from_data_url("x", "iVBORw=="),
            Err(AttachmentError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            ImageAttachment::from_data_url("x", "data:text/plain;base64,aGk="),
            Err(AttachmentError::UnsupportedType(_))
        ));
        assert!(matches!(
            ImageAttachment::from_data_url("x", "data:image/png;base64,***"),
            Err(AttachmentError::InvalidDataUrl(_))
        ));
    }
}
