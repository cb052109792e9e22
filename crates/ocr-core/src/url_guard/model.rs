use std::fmt;

use thiserror::Error;
use url::Url;

/// File extensions that mark a URL as an image reference.
const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"];

/// Why a URL was refused.
///
/// The `Display` text is the user-facing reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UrlRejection {
    #[error("Invalid URL format")]
    InvalidFormat,

    #[error("Only HTTP and HTTPS URLs are allowed")]
    DisallowedScheme,

    #[error("Localhost URLs are not allowed")]
    Localhost,

    #[error("Private IP addresses are not allowed")]
    PrivateAddress,

    #[error("Internal domains are not allowed")]
    InternalDomain,
}

/// Outcome of [`validate_url`](super::validate_url).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlVerdict {
    Valid(ValidatedUrl),
    Invalid(UrlRejection),
}

impl UrlVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, UrlVerdict::Valid(_))
    }

    pub fn rejection(&self) -> Option<UrlRejection> {
        match self {
            UrlVerdict::Valid(_) => None,
            UrlVerdict::Invalid(reason) => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<ValidatedUrl, UrlRejection> {
        match self {
            UrlVerdict::Valid(url) => Ok(url),
            UrlVerdict::Invalid(reason) => Err(reason),
        }
    }
}

/// What the remote resource is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Image,
    Document,
}

/// A URL that passed every guard rule.
///
/// Only constructible by the guard itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    url: Url,
}

impl ValidatedUrl {
    pub(super) fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Classify by extension anywhere in the URL text (query strings included).
    pub fn kind(&self) -> UrlKind {
        let lowered = self.url.as_str().to_ascii_lowercase();
        if IMAGE_EXTENSIONS.iter().any(|ext| lowered.contains(ext)) {
            UrlKind::Image
        } else {
            UrlKind::Document
        }
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
