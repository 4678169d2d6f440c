use thiserror::Error;

use crate::application::upload_gateway::UploadError;

/// Errors surfaced at the HTTP edge. Details are logged, never sent to clients.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("upload failed")]
    UploadFailed(#[source] UploadError),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<UploadError> for ApplicationError {
    fn from(error: UploadError) -> Self {
        match error {
            UploadError::InvalidFile(msg) => ApplicationError::BadRequest(msg),
            other => ApplicationError::UploadFailed(other),
        }
    }
}
