//! Image attachments for chat messages
//!
//! Files are read whole and encoded as `data:` URLs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Text sent with an image when the user typed nothing
pub const DEFAULT_IMAGE_PROMPT: &str = "Please analyze this medical image.";

#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Not an image: {file_name} ({media_type})")]
    NotAnImage {
        file_name: String,
        media_type: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub media_type: String,
    pub data_url: String,
}

impl ImageAttachment {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AttachmentError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AttachmentError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self::from_bytes(file_name, &bytes)
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Result<Self, AttachmentError> {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(AttachmentError::NotAnImage {
                file_name,
                media_type: mime.essence_str().to_string(),
            });
        }
        let media_type = mime.essence_str().to_string();
        let data_url = format!("data:{media_type};base64,{}", STANDARD.encode(bytes));
        tracing::debug!(file = %file_name, media_type = %media_type, size = bytes.len(), "Image attached");
        Ok(Self {
            file_name,
            media_type,
            data_url,
        })
    }
}

/// Message content shown for a send, with or without an image
pub fn compose_content(text: &str, attachment: Option<&ImageAttachment>) -> String {
    let text = text.trim();
    match attachment {
        Some(image) => {
            let prompt = if text.is_empty() { DEFAULT_IMAGE_PROMPT } else { text };
            format!("📷 [Image uploaded: {}]\n{prompt}", image.file_name)
        }
        None => text.to_string(),
    }
}
