use chat_storage::api::{create_router, AppState};
use chat_storage::application::ChatLogService;
use chat_storage::infrastructure::{config::DEFAULT_CONFIG_PATH, AppConfig, GoogleDriveStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_storage=debug,api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let config = AppConfig::load(&config_path)?.with_env_overrides();

    let mut state = AppState::new(config.clone());
    match GoogleDriveStore::connect(&config.drive).await {
        Ok(store) => {
            info!(target_kind = %store.target().kind(), "Google Drive storage initialized");
            let service = ChatLogService::new(Arc::new(store));
            state = state.with_chat_log_service(Arc::new(service));
        }
        // Keep serving so callers get an explicit "not initialized" response.
        Err(e) => error!(error = %e, "Failed to initialize Google Drive storage"),
    }

    let app = create_router(state);
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
