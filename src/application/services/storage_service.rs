use async_trait::async_trait;

use crate::{
    domain::models::file::{NewObject, Permission, RemoteObject},
    services::StorageError,
};

/// Remote object store the upload gateway writes into.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Streams the object body to the store; the returned object carries the
    /// id the store assigned.
    async fn create_object(&self, object: NewObject) -> Result<RemoteObject, StorageError>;
    async fn set_permission(
        &self,
        object_id: &str,
        permission: Permission,
    ) -> Result<(), StorageError>;
    async fn delete_object(&self, object_id: &str) -> Result<(), StorageError>;
}
