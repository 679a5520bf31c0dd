//! Writing export snapshots to disk.

use std::path::{Path, PathBuf};

use builder_core::ExportDocument;

use crate::GatewayError;

/// Write `export` as pretty JSON into `dir`, returning the file path.
///
/// # Errors
///
/// Returns [`GatewayError::Canvas`] if serialization fails or
/// [`GatewayError::Io`] if the file cannot be written.
pub async fn write_export(export: &ExportDocument, dir: &Path) -> Result<PathBuf, GatewayError> {
    let path = dir.join(export.file_name());
    let json = export.to_json_pretty()?;
    tokio::fs::write(&path, json).await?;
    tracing::info!("Exported {} elements to {}", export.elements.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_export_uses_sanitized_name() {
        let export = ExportDocument {
            user_id: json!("u1"),
            elements: Vec::new(),
            workspace_name: "a/b".into(),
            canvas_color: "#ffffff".into(),
            created_at: None,
            updated_at: None,
        };
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_export(&export, dir.path()).await.expect("write");
        assert_eq!(path, dir.path().join("a_b_export.json"));
    }
}
