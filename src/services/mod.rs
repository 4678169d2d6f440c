mod error;
mod google_drive_storage;

pub use error::StorageError;
pub use google_drive_storage::{DriveEndpoints, GDriveStorageService};

use std::sync::Arc;

use crate::{
    application::services::ObjectStorage,
    domain::config::secrets::{DriveSettings, GDriveSecrets},
};

pub fn create_storage_service(
    secrets: &GDriveSecrets,
    settings: &DriveSettings,
) -> Result<Arc<dyn ObjectStorage>, StorageError> {
    let service = GDriveStorageService::new(secrets, settings.request_timeout)?;
    Ok(Arc::new(service))
}
