use std::{path::PathBuf, sync::Arc};

use axum::extract::FromRef;

use crate::{application::upload_gateway::UploadGateway, domain::config::global::GlobalConfig};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub gateway: Arc<UploadGateway>,
    pub global_config: Arc<GlobalConfig>,
    pub staging_dir: Arc<PathBuf>,
}
