//! Clipboard port - read-only access to an image on the system clipboard

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard access denied: {0}")]
    PermissionDenied(String),

    #[error("clipboard read failed: {0}")]
    ReadFailed(String),
}

/// PNG-encoded clipboard image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub png: Bytes,
    pub width: u32,
    pub height: u32,
}

pub trait ClipboardImagePort: Send + Sync {
    /// `Ok(None)` when the clipboard holds no image.
    fn read_image(&self) -> Result<Option<ClipboardImage>, ClipboardError>;
}
