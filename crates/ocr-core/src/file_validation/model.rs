use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;
use thiserror::Error;

/// Where the bytes of a candidate file live.
#[derive(Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Already in memory (clipboard captures, downloaded payloads).
    Memory(Bytes),
    /// On disk; read lazily through the content port.
    Path(PathBuf),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Memory(bytes) => write!(f, "Memory([{} bytes])", bytes.len()),
            FileSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

/// A file selected by the user, not yet accepted.
///
/// `declared_mime` and `size` are what the picker reported; neither is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub declared_mime: String,
    pub size: u64,
    pub source: FileSource,
}

impl CandidateFile {
    pub fn from_bytes(name: impl Into<String>, declared_mime: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            declared_mime: declared_mime.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    pub fn from_path(
        name: impl Into<String>,
        declared_mime: impl Into<String>,
        size: u64,
        path: PathBuf,
    ) -> Self {
        Self {
            name: name.into(),
            declared_mime: declared_mime.into(),
            size,
            source: FileSource::Path(path),
        }
    }

    /// Lower-cased extension after the last dot, if any. A bare `.png`
    /// counts as extension `png`.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Why a single file was refused. The `Display` text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("{mime} is not supported, choose a JPG, PNG, GIF, BMP, WebP or PDF file")]
    UnsupportedType { mime: String },

    #[error("file extension does not match the declared type {mime}")]
    ExtensionMismatch {
        mime: String,
        extension: Option<String>,
    },

    #[error("file is {size} bytes, the limit is {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("file content does not match the declared type {mime}")]
    ContentMismatch { mime: String, header: String },

    #[error("file content could not be read: {reason}")]
    Unreadable { reason: String },

    #[error("too many files selected, at most {max} are processed")]
    TooMany { max: usize },
}

impl FileRejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            FileRejection::UnsupportedType { .. } => RejectionKind::UnsupportedType,
            FileRejection::ExtensionMismatch { .. } => RejectionKind::ExtensionMismatch,
            FileRejection::TooLarge { .. } => RejectionKind::TooLarge,
            FileRejection::ContentMismatch { .. } => RejectionKind::ContentMismatch,
            FileRejection::Unreadable { .. } => RejectionKind::Unreadable,
            FileRejection::TooMany { .. } => RejectionKind::TooMany,
        }
    }
}

/// Failure category used to group batch results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RejectionKind {
    UnsupportedType,
    ExtensionMismatch,
    TooLarge,
    ContentMismatch,
    Unreadable,
    TooMany,
}

/// Non-fatal finding attached to an accepted file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("content of {file} could not be verified: {reason}")]
    ContentUnverified { file: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileVerdict {
    Accepted { warnings: Vec<ValidationWarning> },
    Rejected(FileRejection),
}

impl FileVerdict {
    pub fn accepted() -> Self {
        FileVerdict::Accepted { warnings: Vec::new() }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, FileVerdict::Accepted { .. })
    }

    pub fn rejection(&self) -> Option<&FileRejection> {
        match self {
            FileVerdict::Accepted { .. } => None,
            FileVerdict::Rejected(rejection) => Some(rejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> CandidateFile {
        CandidateFile::from_bytes(name, "image/png", Bytes::new())
    }

    #[test]
    fn extension_is_lowercased_last_segment() {
        assert_eq!(named("scan.final.PNG").extension().as_deref(), Some("png"));
        assert_eq!(named("photo.jpeg").extension().as_deref(), Some("jpeg"));
        assert_eq!(named(".png").extension().as_deref(), Some("png"));
    }

    #[test]
    fn missing_extension_is_none() {
        assert_eq!(named("README").extension(), None);
        assert_eq!(named("trailing.").extension(), None);
    }

    #[test]
    fn memory_source_debug_hides_payload() {
        let file = CandidateFile::from_bytes("a.png", "image/png", Bytes::from_static(b"secret"));
        let rendered = format!("{:?}", file.source);
        assert_eq!(rendered, "Memory([6 bytes])");
    }
}
