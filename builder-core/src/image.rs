//! Embedding image files as base64 data URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::{CanvasError, CanvasResult};

/// An image file encoded for inline storage in an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    mime: &'static str,
    data_uri: String,
}

impl ImageData {
    /// Sniff the image format from `bytes` and encode them as a data URI.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Image`] if the bytes are not a recognised image
    /// format.
    pub fn from_bytes(bytes: &[u8]) -> CanvasResult<Self> {
        let format = ::image::guess_format(bytes)
            .map_err(|e| CanvasError::Image(format!("not an image file: {e}")))?;
        let mime = format.to_mime_type();
        let data_uri = format!("data:{mime};base64,{}", STANDARD.encode(bytes));
        tracing::debug!("Encoded {} byte {mime} image", bytes.len());
        Ok(Self { mime, data_uri })
    }

    /// MIME type of the image.
    #[must_use]
    pub const fn mime(&self) -> &'static str {
        self.mime
    }

    /// The `data:<mime>;base64,...` string.
    #[must_use]
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Consume into the data URI string.
    #[must_use]
    pub fn into_data_uri(self) -> String {
        self.data_uri
    }
}

/// Whether `src` looks like an inline image data URI.
#[must_use]
pub fn is_image_data_uri(src: &str) -> bool {
    src.starts_with("data:image/") && src.contains(";base64,")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_png_bytes_become_data_uri() {
        let image = ImageData::from_bytes(PNG_HEADER).expect("png");
        assert_eq!(image.mime(), "image/png");
        assert!(image.data_uri().starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert!(is_image_data_uri(image.data_uri()));
    }

    #[test]
    fn test_non_image_rejected() {
        let err = ImageData::from_bytes(b"hello world").unwrap_err();
        assert!(matches!(err, CanvasError::Image(_)));
    }

    #[test]
    fn test_data_uri_check() {
        assert!(!is_image_data_uri("https://example.com/a.png"));
        assert!(!is_image_data_uri("data:text/plain;base64,aGk="));
    }
}
