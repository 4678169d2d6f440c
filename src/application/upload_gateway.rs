use std::{
    fmt,
    path::PathBuf,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    application::services::ObjectStorage,
    domain::{
        config::secrets::DriveSettings,
        models::file::{NewObject, ObjectBody, Permission, PublicUrl, StagedFile},
    },
    services::StorageError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    CreatingObject,
    GrantingPermission,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStage::CreatingObject => f.write_str("creating the remote object"),
            UploadStage::GrantingPermission => f.write_str("granting public read access"),
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid file: {0}")]
    InvalidFile(String),

    #[error("cannot read staged file {path}")]
    StagedFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("upload failed while {stage}")]
    Storage {
        stage: UploadStage,
        #[source]
        source: StorageError,
    },
}

impl UploadError {
    pub fn stage(&self) -> Option<UploadStage> {
        match self {
            UploadError::Storage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Pushes staged files to the object store and hands back public URLs.
pub struct UploadGateway {
    storage: Arc<dyn ObjectStorage>,
    folder_id: String,
    public_url_base: String,
    clock: Arc<dyn Clock>,
    last_timestamp: AtomicI64,
}

impl UploadGateway {
    pub fn new(storage: Arc<dyn ObjectStorage>, settings: &DriveSettings) -> Self {
        Self {
            storage,
            folder_id: settings.folder_id.clone(),
            public_url_base: settings.public_url_base.clone(),
            clock: Arc::new(SystemClock),
            last_timestamp: AtomicI64::new(0),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// Uploads `file` into the destination folder, makes it readable by anyone
    /// and returns its public URL. `None` means there was nothing to upload.
    ///
    /// If the permission grant fails the freshly created object is deleted
    /// before the error is returned, so no unreferenced object is left behind
    /// unless that delete fails too.
    pub async fn upload_file_and_get_url(
        &self,
        file: Option<StagedFile>,
    ) -> Result<Option<PublicUrl>, UploadError> {
        let Some(file) = file else {
            debug!("No file provided, skipping upload");
            return Ok(None);
        };

        validate(&file)?;

        let name = file.destination_name(self.next_timestamp());
        info!(
            "Uploading '{}' as '{}' into folder {}",
            file.original_name, name, self.folder_id
        );

        let body = ObjectBody::open(&file.path).await.map_err(|source| {
            error!("Cannot open staged file {}: {}", file.path.display(), source);
            UploadError::StagedFile {
                path: file.path.clone(),
                source,
            }
        })?;

        let object = self
            .storage
            .create_object(NewObject {
                name: name.clone(),
                parent_id: self.folder_id.clone(),
                mime_type: file.mime_type.clone(),
                body,
            })
            .await
            .map_err(|source| {
                error!("Failed to create remote object '{}': {}", name, source);
                UploadError::Storage {
                    stage: UploadStage::CreatingObject,
                    source,
                }
            })?;

        if let Err(source) = self
            .storage
            .set_permission(&object.id, Permission::PUBLIC_READ)
            .await
        {
            error!(
                "Failed to make object {} ('{}') public: {}",
                object.id, object.name, source
            );
            self.roll_back(&object.id).await;
            return Err(UploadError::Storage {
                stage: UploadStage::GrantingPermission,
                source,
            });
        }

        let url = PublicUrl::for_object(&self.public_url_base, &object.id);
        info!("Uploaded '{}' as object {}", object.name, object.id);
        Ok(Some(url))
    }

    async fn roll_back(&self, object_id: &str) {
        match self.storage.delete_object(object_id).await {
            Ok(()) => warn!("Deleted object {} after failed permission grant", object_id),
            Err(e) => error!(
                "Object {} is orphaned in folder {}, rollback failed: {}",
                object_id, self.folder_id, e
            ),
        }
    }

    /// Strictly increasing per gateway, so equal clock readings still yield
    /// distinct destination names.
    fn next_timestamp(&self) -> i64 {
        let now = self.clock.now_millis();
        let mut last = self.last_timestamp.load(Ordering::Acquire);
        loop {
            let candidate = now.max(last + 1);
            match self.last_timestamp.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

fn validate(file: &StagedFile) -> Result<(), UploadError> {
    if file.original_name.trim().is_empty() {
        warn!("Rejecting staged file without a name");
        return Err(UploadError::InvalidFile("file name is empty".to_string()));
    }

    if file.mime_type.parse::<mime::Mime>().is_err() {
        warn!(
            "Rejecting '{}' with invalid MIME type '{}'",
            file.original_name, file.mime_type
        );
        return Err(UploadError::InvalidFile(format!(
            "invalid MIME type '{}'",
            file.mime_type
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{io::Write, sync::Mutex, time::Duration};

    use async_trait::async_trait;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::domain::models::file::RemoteObject;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create {
            name: String,
            parent_id: String,
            mime_type: String,
            len: u64,
        },
        Permission {
            object_id: String,
            permission: Permission,
        },
        Delete {
            object_id: String,
        },
    }

    #[derive(Default)]
    struct RecordingStorage {
        calls: Mutex<Vec<Call>>,
        fixed_id: Option<String>,
        fail_create: bool,
        fail_permission: bool,
        fail_delete: bool,
    }

    impl RecordingStorage {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStorage for RecordingStorage {
        async fn create_object(&self, object: NewObject) -> Result<RemoteObject, StorageError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call::Create {
                name: object.name.clone(),
                parent_id: object.parent_id,
                mime_type: object.mime_type,
                len: object.body.len,
            });
            if self.fail_create {
                return Err(StorageError::NetworkError("connection reset".to_string()));
            }
            let id = self
                .fixed_id
                .clone()
                .unwrap_or_else(|| format!("obj-{}", calls.len()));
            Ok(RemoteObject {
                id,
                name: object.name,
            })
        }

        async fn set_permission(
            &self,
            object_id: &str,
            permission: Permission,
        ) -> Result<(), StorageError> {
            self.calls.lock().unwrap().push(Call::Permission {
                object_id: object_id.to_string(),
                permission,
            });
            if self.fail_permission {
                return Err(StorageError::Unauthorized("insufficient scope".to_string()));
            }
            Ok(())
        }

        async fn delete_object(&self, object_id: &str) -> Result<(), StorageError> {
            self.calls.lock().unwrap().push(Call::Delete {
                object_id: object_id.to_string(),
            });
            if self.fail_delete {
                return Err(StorageError::ProviderError("backend unavailable".to_string()));
            }
            Ok(())
        }
    }

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    fn settings() -> DriveSettings {
        DriveSettings {
            folder_id: "school-folder".to_string(),
            public_url_base: DriveSettings::DEFAULT_PUBLIC_URL_BASE.to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    fn gateway(storage: &Arc<RecordingStorage>) -> UploadGateway {
        UploadGateway::new(storage.clone(), &settings())
            .with_clock(Arc::new(FixedClock(1_700_000_000_000)))
    }

    fn staged(contents: &[u8], name: &str, mime_type: &str) -> (NamedTempFile, StagedFile) {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(contents).unwrap();
        let file = StagedFile::new(tmp.path(), name, mime_type);
        (tmp, file)
    }

    #[tokio::test]
    async fn absent_file_makes_no_calls() {
        let storage = Arc::new(RecordingStorage::default());
        let result = gateway(&storage).upload_file_and_get_url(None).await.unwrap();

        assert!(result.is_none());
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn upload_creates_then_publishes_and_returns_url() {
        let storage = Arc::new(RecordingStorage {
            fixed_id: Some("XYZ123".to_string()),
            ..Default::default()
        });
        let (_tmp, file) = staged(b"\x89PNG fake", "logo.png", "image/png");

        let url = gateway(&storage)
            .upload_file_and_get_url(Some(file))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(url.as_str(), "https://drive.google.com/uc?id=XYZ123");
        assert_eq!(
            storage.calls(),
            vec![
                Call::Create {
                    name: "1700000000000_logo.png".to_string(),
                    parent_id: "school-folder".to_string(),
                    mime_type: "image/png".to_string(),
                    len: 10,
                },
                Call::Permission {
                    object_id: "XYZ123".to_string(),
                    permission: Permission::PUBLIC_READ,
                },
            ]
        );
    }

    #[tokio::test]
    async fn create_failure_skips_permission() {
        let storage = Arc::new(RecordingStorage {
            fail_create: true,
            ..Default::default()
        });
        let (_tmp, file) = staged(b"report", "report.pdf", "application/pdf");

        let err = gateway(&storage)
            .upload_file_and_get_url(Some(file))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(UploadStage::CreatingObject));
        assert!(matches!(
            err,
            UploadError::Storage {
                source: StorageError::NetworkError(_),
                ..
            }
        ));
        let calls = storage.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], Call::Create { .. }));
    }

    #[tokio::test]
    async fn permission_failure_deletes_created_object() {
        let storage = Arc::new(RecordingStorage {
            fixed_id: Some("ORPHAN1".to_string()),
            fail_permission: true,
            ..Default::default()
        });
        let (_tmp, file) = staged(b"data", "notes.txt", "text/plain");

        let err = gateway(&storage)
            .upload_file_and_get_url(Some(file))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(UploadStage::GrantingPermission));
        let calls = storage.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[2],
            Call::Delete {
                object_id: "ORPHAN1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failed_rollback_still_reports_permission_error() {
        let storage = Arc::new(RecordingStorage {
            fail_permission: true,
            fail_delete: true,
            ..Default::default()
        });
        let (_tmp, file) = staged(b"data", "notes.txt", "text/plain");

        let err = gateway(&storage)
            .upload_file_and_get_url(Some(file))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UploadError::Storage {
                stage: UploadStage::GrantingPermission,
                source: StorageError::Unauthorized(_),
            }
        ));
        assert_eq!(storage.calls().len(), 3);
    }

    #[tokio::test]
    async fn repeated_uploads_get_distinct_names_and_urls() {
        let storage = Arc::new(RecordingStorage::default());
        let gateway = gateway(&storage);

        let (_a, first) = staged(b"one", "photo.jpg", "image/jpeg");
        let (_b, second) = staged(b"two", "photo.jpg", "image/jpeg");
        let first_url = gateway.upload_file_and_get_url(Some(first)).await.unwrap();
        let second_url = gateway.upload_file_and_get_url(Some(second)).await.unwrap();

        assert_ne!(first_url, second_url);
        let names: Vec<String> = storage
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create { name, .. } => Some(name),
                _ => None,
            })
            .collect();
        assert_eq!(
            names,
            vec!["1700000000000_photo.jpg", "1700000000001_photo.jpg"]
        );
    }

    #[tokio::test]
    async fn invalid_mime_type_is_rejected_before_upload() {
        let storage = Arc::new(RecordingStorage::default());
        let (_tmp, file) = staged(b"x", "x.bin", "not a mime");

        let err = gateway(&storage)
            .upload_file_and_get_url(Some(file))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::InvalidFile(_)));
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn unreadable_staged_file_makes_no_calls() {
        let storage = Arc::new(RecordingStorage::default());
        let file = StagedFile::new("/nonexistent/staged/file.png", "file.png", "image/png");

        let err = gateway(&storage)
            .upload_file_and_get_url(Some(file))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::StagedFile { .. }));
        assert!(storage.calls().is_empty());
    }
}
