use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client, Response, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::{
    application::services::ObjectStorage,
    domain::{
        config::secrets::GDriveSecrets,
        models::file::{NewObject, ObjectBody, Permission, RemoteObject},
    },
    services::error::StorageError,
};

const GOOGLE_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const GOOGLE_UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";
const TOKEN_LIFETIME_SECS: u64 = 3600;
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Base URLs of the Drive REST API.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveEndpoints {
    pub api_base: String,
    pub upload_base: String,
}

impl DriveEndpoints {
    /// Endpoints under an arbitrary root, laid out like googleapis.com.
    pub fn with_root(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            api_base: format!("{}/drive/v3", root),
            upload_base: format!("{}/upload/drive/v3", root),
        }
    }
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            api_base: GOOGLE_DRIVE_API_BASE.to_string(),
            upload_base: GOOGLE_UPLOAD_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServiceAccountCredentials {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DriveFileMetadata {
    id: String,
    name: Option<String>,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

pub struct GDriveStorageService {
    client: Client,
    endpoints: DriveEndpoints,
    credentials: ServiceAccountCredentials,
    access_token: tokio::sync::Mutex<Option<CachedToken>>,
}

impl GDriveStorageService {
    pub fn new(secrets: &GDriveSecrets, timeout: Duration) -> Result<Self, StorageError> {
        let credentials: ServiceAccountCredentials =
            serde_json::from_str(secrets.google_credentials())
                .map_err(|e| StorageError::InvalidCredentials(e.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        Ok(Self {
            client,
            endpoints: DriveEndpoints::default(),
            credentials,
            access_token: tokio::sync::Mutex::new(None),
        })
    }

    pub fn with_endpoints(mut self, endpoints: DriveEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    async fn get_access_token(&self) -> Result<String, StorageError> {
        // Held across the exchange so concurrent uploads share one refresh.
        let mut cached = self.access_token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let jwt = self.create_jwt()?;

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StorageError::Unauthorized(format!(
                "Token exchange failed with status {}: {}",
                status, error_text
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Unauthorized(e.to_string()))?;

        let lifetime =
            Duration::from_secs(token_response.expires_in.unwrap_or(TOKEN_LIFETIME_SECS));
        *cached = Some(CachedToken {
            value: token_response.access_token.clone(),
            refresh_at: Instant::now() + lifetime.saturating_sub(TOKEN_REFRESH_MARGIN),
        });
        debug!("Obtained Drive access token for {}", self.credentials.client_email);

        Ok(token_response.access_token)
    }

    fn create_jwt(&self) -> Result<String, StorageError> {
        use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
        use serde::Serialize;

        #[derive(Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: &'a str,
            aud: &'a str,
            exp: i64,
            iat: i64,
        }

        let now = Utc::now().timestamp();

        let claims = Claims {
            iss: &self.credentials.client_email,
            scope: DRIVE_FILE_SCOPE,
            aud: &self.credentials.token_uri,
            exp: now + TOKEN_LIFETIME_SECS as i64,
            iat: now,
        };

        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| StorageError::InvalidCredentials(e.to_string()))?;

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| StorageError::InternalError(e.to_string()))
    }

    async fn ensure_success(
        &self,
        response: Response,
        operation: &str,
    ) -> Result<Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            // Token was revoked early; the next call must exchange a new one.
            *self.access_token.lock().await = None;
        }
        let error_text = response.text().await.unwrap_or_default();
        Err(StorageError::from_status(status, operation, &error_text))
    }
}

#[async_trait]
impl ObjectStorage for GDriveStorageService {
    async fn create_object(&self, object: NewObject) -> Result<RemoteObject, StorageError> {
        let token = self.get_access_token().await?;

        let NewObject {
            name,
            parent_id,
            mime_type,
            body: ObjectBody { file, len },
        } = object;

        let file_metadata = serde_json::json!({
            "name": name,
            "mimeType": mime_type,
            "parents": [parent_id],
        });

        let metadata_part = multipart::Part::text(file_metadata.to_string())
            .mime_str("application/json")
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        let file_part = multipart::Part::stream_with_length(
            reqwest::Body::wrap_stream(ReaderStream::new(file)),
            len,
        )
        .mime_str(&mime_type)
        .map_err(|e| StorageError::InternalError(e.to_string()))?;

        let form = multipart::Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        let url = format!(
            "{}/files?uploadType=multipart&fields=id,name&supportsAllDrives=true",
            self.endpoints.upload_base
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let drive_metadata: DriveFileMetadata = self.ensure_success(response, "Upload")
            .await?
            .json()
            .await
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        let object = RemoteObject {
            id: drive_metadata.id,
            name: drive_metadata.name.unwrap_or(name),
        };
        info!("Drive created file {} ({})", object.id, object.name);

        Ok(object)
    }

    async fn set_permission(
        &self,
        object_id: &str,
        permission: Permission,
    ) -> Result<(), StorageError> {
        let token = self.get_access_token().await?;

        let url = format!(
            "{}/files/{}/permissions?supportsAllDrives=true",
            self.endpoints.api_base, object_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&permission)
            .send()
            .await?;

        self.ensure_success(response, "Permission grant").await?;
        Ok(())
    }

    async fn delete_object(&self, object_id: &str) -> Result<(), StorageError> {
        let token = self.get_access_token().await?;

        let url = format!(
            "{}/files/{}?supportsAllDrives=true",
            self.endpoints.api_base, object_id
        );

        let response = self
            .client
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await?;

        self.ensure_success(response, "Delete").await?;
        Ok(())
    }
}
