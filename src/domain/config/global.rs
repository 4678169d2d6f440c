/// Upload policy applied at the HTTP edge before anything is staged.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    /// Allowed MIME types; empty means any type is accepted.
    pub mime_types: Vec<String>,
    pub max_size: u64,
}

impl GlobalConfig {
    pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

    /// Matches on the type/subtype essence, so parameters such as
    /// `charset` never cause a rejection.
    pub fn allows_mime_type(&self, mime_type: &str) -> bool {
        if self.mime_types.is_empty() {
            return true;
        }
        let Ok(mime) = mime_type.parse::<mime::Mime>() else {
            return false;
        };
        self.mime_types
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(mime.essence_str()))
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            mime_types: Vec::new(),
            max_size: Self::DEFAULT_MAX_SIZE,
        }
    }
}
