//! File attachments sent alongside a user query

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest attachment accepted for inline transfer (20 MiB)
pub const MAX_ATTACHMENT_BYTES: usize = 20 * 1024 * 1024;

/// Mime types every backend accepts as inline data
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/gif",
    "image/heic",
    "image/heif",
    "application/pdf",
    "text/plain",
];

/// Errors converting an attachment into its inline transfer form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("Attachment '{0}' is empty")]
    Empty(String),

    #[error("Attachment '{filename}' has unsupported type {mime_type}")]
    UnsupportedType { filename: String, mime_type: String },

    #[error("Attachment '{filename}' is {size} bytes (limit {limit})")]
    TooLarge {
        filename: String,
        size: usize,
        limit: usize,
    },
}

/// Raw attachment as provided by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

impl Attachment {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            filename: filename.into(),
        }
    }

    /// Guess a mime type from a file name's extension.
    pub fn guess_mime_type(filename: &str) -> &'static str {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "heic" => "image/heic",
            "heif" => "image/heif",
            "pdf" => "application/pdf",
            "txt" | "md" => "text/plain",
            _ => "application/octet-stream",
        }
    }

    /// Whether this attachment is an image (for prompt wording)
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Convert into the base64 form backends accept.
    pub fn encode(&self) -> Result<InlineAttachment, AttachmentError> {
        if self.bytes.is_empty() {
            return Err(AttachmentError::Empty(self.filename.clone()));
        }
        if !SUPPORTED_MIME_TYPES.contains(&self.mime_type.as_str()) {
            return Err(AttachmentError::UnsupportedType {
                filename: self.filename.clone(),
                mime_type: self.mime_type.clone(),
            });
        }
        if self.bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                filename: self.filename.clone(),
                size: self.bytes.len(),
                limit: MAX_ATTACHMENT_BYTES,
            });
        }

        Ok(InlineAttachment {
            mime_type: self.mime_type.clone(),
            filename: self.filename.clone(),
            base64_data: STANDARD.encode(&self.bytes),
        })
    }
}

/// Attachment in inline transfer form, owned by a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineAttachment {
    pub mime_type: String,
    pub filename: String,
    pub base64_data: String,
}

impl InlineAttachment {
    /// `data:` URL form used by OpenAI-compatible APIs
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}
