use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct LocalConfig {
    pub port: u16,
    /// `None` means permissive CORS.
    pub cors_allowed_origins: Option<Vec<String>>,
    pub staging_dir: PathBuf,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_allowed_origins: None,
            staging_dir: std::env::temp_dir(),
        }
    }
}
