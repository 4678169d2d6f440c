use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UploadFileResponse {
    /// `None` when the request carried no file.
    pub url: Option<String>,
}
