use std::io::Cursor;

use arboard::Clipboard;
use bytes::Bytes;
use image::{ImageFormat, RgbaImage};
use tracing::debug;

use ocr_core::ports::{ClipboardError, ClipboardImage, ClipboardImagePort};

/// System clipboard through `arboard`. Images are re-encoded as PNG.
#[derive(Default)]
pub struct ArboardClipboard;

impl ArboardClipboard {
    pub fn new() -> Self {
        Self
    }
}

fn encode_png(width: u32, height: u32, rgba: Vec<u8>) -> Result<Bytes, ClipboardError> {
    let image = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        ClipboardError::ReadFailed(format!(
            "clipboard image buffer does not match {width}x{height}"
        ))
    })?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ClipboardError::ReadFailed(format!("failed to encode PNG: {e}")))?;
    Ok(Bytes::from(png))
}

impl ClipboardImagePort for ArboardClipboard {
    fn read_image(&self) -> Result<Option<ClipboardImage>, ClipboardError> {
        let mut clipboard = Clipboard::new().map_err(|e| match e {
            arboard::Error::ClipboardNotSupported => {
                ClipboardError::PermissionDenied(e.to_string())
            }
            other => ClipboardError::ReadFailed(other.to_string()),
        })?;

        let data = match clipboard.get_image() {
            Ok(data) => data,
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => return Err(ClipboardError::ReadFailed(e.to_string())),
        };

        let width = u32::try_from(data.width)
            .map_err(|_| ClipboardError::ReadFailed("image too wide".to_string()))?;
        let height = u32::try_from(data.height)
            .map_err(|_| ClipboardError::ReadFailed("image too tall".to_string()))?;

        let png = encode_png(width, height, data.bytes.into_owned())?;
        debug!(width, height, bytes = png.len(), "clipboard image captured");

        Ok(Some(ClipboardImage { png, width, height }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_rgba_as_png() {
        let png = encode_png(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).expect("png");
        assert_eq!(&png[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let err = encode_png(4, 4, vec![0; 3]).unwrap_err();
        assert!(matches!(err, ClipboardError::ReadFailed(_)));
    }
}
