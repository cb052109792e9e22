use std::fmt;

/// Number of leading bytes inspected by the signature check.
pub const HEADER_PROBE_LEN: usize = 4;

/// File formats accepted by the OCR pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Pdf,
}

/// Lower-cased `type/subtype` of a MIME string, without parameters.
pub fn mime_essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

impl SupportedFormat {
    pub const ALL: [SupportedFormat; 6] = [
        SupportedFormat::Jpeg,
        SupportedFormat::Png,
        SupportedFormat::Gif,
        SupportedFormat::Bmp,
        SupportedFormat::Webp,
        SupportedFormat::Pdf,
    ];

    /// Resolve a declared MIME type. Parameters such as `; charset=` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let format = match mime_essence(mime).as_str() {
            "image/jpeg" | "image/jpg" => SupportedFormat::Jpeg,
            "image/png" => SupportedFormat::Png,
            "image/gif" => SupportedFormat::Gif,
            "image/bmp" => SupportedFormat::Bmp,
            "image/webp" => SupportedFormat::Webp,
            "application/pdf" => SupportedFormat::Pdf,
            _ => return None,
        };
        Some(format)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        let lowered = extension.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&lowered.as_str()))
    }

    pub fn mime(self) -> &'static str {
        match self {
            SupportedFormat::Jpeg => "image/jpeg",
            SupportedFormat::Png => "image/png",
            SupportedFormat::Gif => "image/gif",
            SupportedFormat::Bmp => "image/bmp",
            SupportedFormat::Webp => "image/webp",
            SupportedFormat::Pdf => "application/pdf",
        }
    }

    /// Extensions conventionally associated with the format, lower-case.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SupportedFormat::Jpeg => &["jpg", "jpeg"],
            SupportedFormat::Png => &["png"],
            SupportedFormat::Gif => &["gif"],
            SupportedFormat::Bmp => &["bmp"],
            SupportedFormat::Webp => &["webp"],
            SupportedFormat::Pdf => &["pdf"],
        }
    }

    /// Accepted header prefixes as uppercase hex. Empty for formats that are
    /// not content-checked.
    pub fn signatures(self) -> &'static [&'static str] {
        match self {
            SupportedFormat::Jpeg => &["FFD8FF"],
            SupportedFormat::Png => &["89504E47"],
            SupportedFormat::Gif => &["47494638"],
            SupportedFormat::Bmp => &["424D"],
            SupportedFormat::Webp => &["52494646", "52494658"],
            SupportedFormat::Pdf => &[],
        }
    }

    pub fn is_image(self) -> bool {
        !matches!(self, SupportedFormat::Pdf)
    }

    /// PDFs are exempt from content sniffing.
    pub fn requires_content_check(self) -> bool {
        self.is_image()
    }

    pub fn matches_header(self, header: &[u8]) -> bool {
        let probe = &header[..header.len().min(HEADER_PROBE_LEN)];
        let rendered = hex::encode_upper(probe);
        self.signatures()
            .iter()
            .any(|signature| rendered.starts_with(signature))
    }
}

impl fmt::Display for SupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SupportedFormat::Jpeg => "JPG",
            SupportedFormat::Png => "PNG",
            SupportedFormat::Gif => "GIF",
            SupportedFormat::Bmp => "BMP",
            SupportedFormat::Webp => "WebP",
            SupportedFormat::Pdf => "PDF",
        };
        f.write_str(label)
    }
}
