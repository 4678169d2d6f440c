//! Streams an incoming multipart file part into a temporary file so the
//! upload gateway can read it from disk.

use std::path::Path;

use axum::{extract::multipart::Field, http::StatusCode};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::{application::error::ApplicationError, domain::models::file::StagedFile};

/// A staged file plus the guard that removes it from disk when dropped.
pub struct StagedUpload {
    pub file: StagedFile,
    pub size: u64,
    _temp_path: TempPath,
}

pub async fn stage_field(
    mut field: Field<'_>,
    original_name: String,
    mime_type: String,
    staging_dir: &Path,
    max_size: u64,
) -> Result<StagedUpload, ApplicationError> {
    let temp = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(staging_dir)
        .map_err(|e| {
            ApplicationError::InternalError(format!(
                "Cannot create staging file in {}: {}",
                staging_dir.display(),
                e
            ))
        })?;
    let (std_file, temp_path) = temp.into_parts();
    let mut out = tokio::fs::File::from_std(std_file);

    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApplicationError::PayloadTooLarge
        } else {
            warn!("Cannot read file part: {}", e);
            ApplicationError::BadRequest("Invalid file data".to_string())
        }
    })? {
        size += chunk.len() as u64;
        if size > max_size {
            return Err(ApplicationError::PayloadTooLarge);
        }
        out.write_all(&chunk).await.map_err(|e| {
            ApplicationError::InternalError(format!("Cannot write staging file: {}", e))
        })?;
    }
    out.flush()
        .await
        .map_err(|e| ApplicationError::InternalError(format!("Cannot flush staging file: {}", e)))?;
    drop(out);

    debug!(
        "Staged '{}' ({} bytes) at {}",
        original_name,
        size,
        temp_path.display()
    );

    Ok(StagedUpload {
        file: StagedFile::new(temp_path.to_path_buf(), original_name, mime_type),
        size,
        _temp_path: temp_path,
    })
}
