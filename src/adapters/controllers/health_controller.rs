use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use sysinfo::System;
use tracing::debug;

use crate::{application::upload_gateway::UploadGateway, domain::config::global::GlobalConfig};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub folder_id: String,
    pub max_size: u64,
    pub allowed_mime_types: Vec<String>,
    pub memory_used_bytes: u64,
    pub cpu_usage_percent: f32,
}

pub struct HealthController;

impl HealthController {
    /// GET /api/v1/health
    pub async fn health_check(
        State(gateway): State<Arc<UploadGateway>>,
        State(global_config): State<Arc<GlobalConfig>>,
    ) -> Json<HealthResponse> {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        debug!("Health check, {} bytes in use", sys.used_memory());

        Json(HealthResponse {
            status: "healthy",
            folder_id: gateway.folder_id().to_string(),
            max_size: global_config.max_size,
            allowed_mime_types: global_config.mime_types.clone(),
            memory_used_bytes: sys.used_memory(),
            cpu_usage_percent: sys.global_cpu_usage(),
        })
    }
}
