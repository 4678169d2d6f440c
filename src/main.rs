use std::sync::Arc;

use campus_upload_gateway::{
    adapters::router::cors_layer,
    application::upload_gateway::UploadGateway,
    create_app,
    domain::config::{secrets::GDriveSecrets, Settings},
    services, AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().expect("ERROR: Invalid configuration");

    tracing::info!(
        "Starting campus-upload-gateway, uploading into Drive folder {}",
        settings.drive.folder_id
    );

    let secrets = GDriveSecrets::from_credentials_file(&settings.credentials_path)
        .expect("ERROR: Failed to load Google service-account credentials");

    let storage_service = services::create_storage_service(&secrets, &settings.drive)
        .expect("Failed to create storage service");

    let cors = cors_layer(&settings.local).expect("Invalid CORS origin");

    let app_state = AppState {
        gateway: Arc::new(UploadGateway::new(storage_service, &settings.drive)),
        global_config: Arc::new(settings.global.clone()),
        staging_dir: Arc::new(settings.local.staging_dir.clone()),
    };

    let router = create_app(app_state).layer(cors);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.local.port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", settings.local.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
