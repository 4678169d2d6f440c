use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// A file already written to local storage by the staging layer, waiting to be
/// pushed to the remote store.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: PathBuf,
    pub original_name: String,
    pub mime_type: String,
}

impl StagedFile {
    pub fn new(
        path: impl Into<PathBuf>,
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            original_name: original_name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Name under which the object is created remotely.
    pub fn destination_name(&self, timestamp_millis: i64) -> String {
        format!("{}_{}", timestamp_millis, self.original_name)
    }
}

/// Content handed to the storage service. Owning the handle means it is closed
/// as soon as the storage call returns.
#[derive(Debug)]
pub struct ObjectBody {
    pub file: tokio::fs::File,
    pub len: u64,
}

impl ObjectBody {
    pub async fn open(path: &std::path::Path) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        let len = file.metadata().await?.len();
        Ok(Self { file, len })
    }
}

#[derive(Debug)]
pub struct NewObject {
    pub name: String,
    pub parent_id: String,
    pub mime_type: String,
    pub body: ObjectBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionRole {
    Reader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionScope {
    Anyone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub role: PermissionRole,
    #[serde(rename = "type")]
    pub scope: PermissionScope,
}

impl Permission {
    pub const PUBLIC_READ: Permission = Permission {
        role: PermissionRole::Reader,
        scope: PermissionScope::Anyone,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObject {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicUrl(String);

impl PublicUrl {
    pub fn for_object(base: &str, object_id: &str) -> Self {
        Self(format!("{}?id={}", base.trim_end_matches('/'), object_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PublicUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
