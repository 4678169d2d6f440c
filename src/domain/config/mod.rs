pub mod global;
pub mod local;
pub mod secrets;

use std::{collections::HashMap, path::PathBuf, time::Duration};

use thiserror::Error;

use global::GlobalConfig;
use local::LocalConfig;
use secrets::DriveSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("cannot read credentials file {path}: {source}")]
    CredentialsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials_path: PathBuf,
    pub drive: DriveSettings,
    pub local: LocalConfig,
    pub global: GlobalConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let credentials_path = PathBuf::from(required("GOOGLE_APPLICATION_CREDENTIALS")?);
        let folder_id = required("DRIVE_FOLDER_ID")?.to_string();

        let defaults = LocalConfig::default();
        let port = match get("PORT") {
            Some(v) => parse(v, "PORT")?,
            None => defaults.port,
        };
        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(split_list);
        let staging_dir = get("UPLOAD_STAGING_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.staging_dir);

        let max_size = match get("MAX_UPLOAD_SIZE") {
            Some(v) => parse(v, "MAX_UPLOAD_SIZE")?,
            None => GlobalConfig::DEFAULT_MAX_SIZE,
        };
        let mime_types = get("ALLOWED_MIME_TYPES").map(split_list).unwrap_or_default();

        let public_url_base = get("PUBLIC_URL_BASE")
            .unwrap_or(DriveSettings::DEFAULT_PUBLIC_URL_BASE)
            .to_string();
        let request_timeout = match get("DRIVE_REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse(v, "DRIVE_REQUEST_TIMEOUT_SECS")?),
            None => DriveSettings::DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            credentials_path,
            drive: DriveSettings {
                folder_id,
                public_url_base,
                request_timeout,
            },
            local: LocalConfig {
                port,
                cors_allowed_origins,
                staging_dir,
            },
            global: GlobalConfig {
                mime_types,
                max_size,
            },
        })
    }
}

fn parse<T: std::str::FromStr>(value: &str, name: &'static str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn minimal_environment_uses_defaults() {
        let settings = Settings::from_vars(&vars(&[
            ("GOOGLE_APPLICATION_CREDENTIALS", "/etc/school/sa.json"),
            ("DRIVE_FOLDER_ID", "folder-1"),
        ]))
        .unwrap();

        assert_eq!(settings.credentials_path, PathBuf::from("/etc/school/sa.json"));
        assert_eq!(settings.drive.folder_id, "folder-1");
        assert_eq!(settings.drive.public_url_base, "https://drive.google.com/uc");
        assert_eq!(settings.drive.request_timeout, Duration::from_secs(60));
        assert_eq!(settings.local.port, 8080);
        assert!(settings.local.cors_allowed_origins.is_none());
        assert_eq!(settings.global, GlobalConfig::default());
    }

    #[test]
    fn optional_values_are_parsed() {
        let settings = Settings::from_vars(&vars(&[
            ("GOOGLE_APPLICATION_CREDENTIALS", "sa.json"),
            ("DRIVE_FOLDER_ID", "folder-1"),
            ("PORT", "9090"),
            ("CORS_ALLOWED_ORIGINS", "https://school.example, https://admin.example"),
            ("MAX_UPLOAD_SIZE", "2048"),
            ("ALLOWED_MIME_TYPES", "image/png,application/pdf"),
            ("DRIVE_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(settings.local.port, 9090);
        assert_eq!(
            settings.local.cors_allowed_origins.unwrap(),
            vec!["https://school.example", "https://admin.example"]
        );
        assert_eq!(settings.global.max_size, 2048);
        assert!(settings.global.allows_mime_type("application/pdf"));
        assert!(!settings.global.allows_mime_type("text/html"));
        assert_eq!(settings.drive.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_folder_is_rejected() {
        let err = Settings::from_vars(&vars(&[("GOOGLE_APPLICATION_CREDENTIALS", "sa.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DRIVE_FOLDER_ID")));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = Settings::from_vars(&vars(&[
            ("GOOGLE_APPLICATION_CREDENTIALS", "sa.json"),
            ("DRIVE_FOLDER_ID", "folder-1"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }
}
