//! Loading image files for embedding.

use std::path::Path;

use builder_core::ImageData;

use crate::GatewayError;

/// Read an image file off the UI thread and encode it as a data URI.
///
/// # Errors
///
/// Returns [`GatewayError::Io`] if the file cannot be read, or
/// [`GatewayError::Canvas`] if it is not an image.
pub async fn load_image(path: &Path) -> Result<ImageData, GatewayError> {
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(ImageData::from_bytes(&bytes)?)
}
