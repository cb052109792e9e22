use crate::ports::ContentReadError;

use super::format::SupportedFormat;
use super::model::{CandidateFile, FileRejection, FileVerdict, ValidationWarning};

pub const DEFAULT_MAX_SIZE_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_MAX_COUNT: usize = 50;

/// What to do when the header of a file cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentReadPolicy {
    /// Accept the file and attach a [`ValidationWarning`].
    #[default]
    SoftPass,
    /// Reject the file as unreadable.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLimits {
    pub max_size_bytes: u64,
    pub max_count: usize,
    pub content_read_policy: ContentReadPolicy,
}

impl Default for FileLimits {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            max_count: DEFAULT_MAX_COUNT,
            content_read_policy: ContentReadPolicy::default(),
        }
    }
}

/// Decides whether a candidate file may be queued for OCR.
///
/// Checks run in order, first failure wins: declared type, extension,
/// size, then content signature (images only).
#[derive(Debug, Clone, Default)]
pub struct FileValidationPolicy {
    limits: FileLimits,
}

impl FileValidationPolicy {
    pub fn new(limits: FileLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &FileLimits {
        &self.limits
    }

    /// Metadata-only checks. On success returns the resolved format, which
    /// tells the caller whether header bytes are needed.
    pub fn precheck(&self, file: &CandidateFile) -> Result<SupportedFormat, FileRejection> {
        let format = SupportedFormat::from_mime(&file.declared_mime).ok_or_else(|| {
            FileRejection::UnsupportedType {
                mime: file.declared_mime.clone(),
            }
        })?;

        let extension = file.extension();
        let consistent = extension
            .as_deref()
            .is_some_and(|ext| format.extensions().contains(&ext));
        if !consistent {
            return Err(FileRejection::ExtensionMismatch {
                mime: file.declared_mime.clone(),
                extension,
            });
        }

        if file.size > self.limits.max_size_bytes {
            return Err(FileRejection::TooLarge {
                size: file.size,
                max: self.limits.max_size_bytes,
            });
        }

        Ok(format)
    }

    /// Judge the header read for `file`. `header` is the outcome of reading up
    /// to [`HEADER_PROBE_LEN`](super::HEADER_PROBE_LEN) bytes.
    pub fn decide_content(
        &self,
        file: &CandidateFile,
        format: SupportedFormat,
        header: Result<&[u8], &ContentReadError>,
    ) -> FileVerdict {
        if !format.requires_content_check() {
            return FileVerdict::accepted();
        }

        match header {
            Ok(bytes) if format.matches_header(bytes) => FileVerdict::accepted(),
            Ok(bytes) => FileVerdict::Rejected(FileRejection::ContentMismatch {
                mime: file.declared_mime.clone(),
                header: hex::encode_upper(bytes),
            }),
            Err(err) => match self.limits.content_read_policy {
                ContentReadPolicy::SoftPass => FileVerdict::Accepted {
                    warnings: vec![ValidationWarning::ContentUnverified {
                        file: file.name.clone(),
                        reason: err.to_string(),
                    }],
                },
                ContentReadPolicy::Reject => FileVerdict::Rejected(FileRejection::Unreadable {
                    reason: err.to_string(),
                }),
            },
        }
    }
}
