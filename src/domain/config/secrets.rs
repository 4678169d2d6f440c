use std::{path::Path, time::Duration};

use super::ConfigError;

/// Raw service-account JSON document, read once at startup.
#[derive(Debug, Clone)]
pub struct GDriveSecrets(String);

impl GDriveSecrets {
    pub fn new(google_credentials: impl Into<String>) -> Self {
        Self(google_credentials.into())
    }

    pub fn from_credentials_file(path: &Path) -> Result<Self, ConfigError> {
        std::fs::read_to_string(path)
            .map(Self)
            .map_err(|source| ConfigError::CredentialsFile {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn google_credentials(&self) -> &str {
        &self.0
    }
}

/// Everything the Drive-backed upload path needs besides credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveSettings {
    pub folder_id: String,
    pub public_url_base: String,
    pub request_timeout: Duration,
}

impl DriveSettings {
    pub const DEFAULT_PUBLIC_URL_BASE: &'static str = "https://drive.google.com/uc";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
}
