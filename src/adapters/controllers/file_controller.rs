use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::{
    adapters::{
        dto::file_dto::UploadFileResponse,
        staging::{stage_field, StagedUpload},
    },
    application::{error::ApplicationError, upload_gateway::UploadGateway},
    domain::{config::global::GlobalConfig, models::file::PublicUrl},
};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub struct FileController;

impl FileController {
    /// Stages the `file` part of a multipart request and uploads it.
    /// POST /api/v1/uploads
    ///
    /// Responds 201 with the public URL, or 200 with a null URL when the
    /// request carried no file.
    pub async fn upload_file(
        State(gateway): State<Arc<UploadGateway>>,
        State(global_config): State<Arc<GlobalConfig>>,
        State(staging_dir): State<Arc<PathBuf>>,
        mut multipart: Multipart,
    ) -> Result<(StatusCode, Json<UploadFileResponse>), ApplicationError> {
        let mut staged: Option<StagedUpload> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("Invalid multipart data: {}", e);
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApplicationError::PayloadTooLarge
            } else {
                ApplicationError::BadRequest("Invalid request format".to_string())
            }
        })? {
            if field.name() != Some("file") || staged.is_some() {
                continue;
            }

            // Browsers send an empty filename when no file was picked.
            let Some(original_name) = field
                .file_name()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
            else {
                continue;
            };

            let mime_type = field
                .content_type()
                .unwrap_or(DEFAULT_MIME_TYPE)
                .to_string();

            if !global_config.allows_mime_type(&mime_type) {
                return Err(ApplicationError::BadRequest(format!(
                    "MIME type '{}' not allowed",
                    mime_type
                )));
            }

            staged = Some(
                stage_field(
                    field,
                    original_name,
                    mime_type,
                    &staging_dir,
                    global_config.max_size,
                )
                .await?,
            );
        }

        let status = match &staged {
            Some(upload) => {
                info!(
                    "Received '{}' ({} bytes, {})",
                    upload.file.original_name, upload.size, upload.file.mime_type
                );
                StatusCode::CREATED
            }
            None => {
                info!("Upload request without a file");
                StatusCode::OK
            }
        };

        let url = gateway
            .upload_file_and_get_url(staged.as_ref().map(|upload| upload.file.clone()))
            .await?;

        // The staged copy is removed when `staged` drops, success or not.
        Ok((
            status,
            Json(UploadFileResponse {
                url: url.map(PublicUrl::into_string),
            }),
        ))
    }
}
