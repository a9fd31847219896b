use backup_dashboard::api::HttpBackupApi;
use backup_dashboard::app::shutdown_on;
use backup_dashboard::{AppState, DashboardConfig, FileStore, router};
use std::{net::SocketAddr, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = DashboardConfig::from_env()?;
    let api = Arc::new(HttpBackupApi::new(&config.backend_url, config.request_timeout)?);
    let store = Arc::new(FileStore::open(&config.prefs_path).await?);
    info!(backend = %config.backend_url, prefs = %store.path().display(), "dashboard configured");

    let state = AppState::new(api, store);
    let cancel = CancellationToken::new();
    let pollers = state.start_pollers(&config, cancel.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c(), cancel.clone()))
        .await?;

    cancel.cancel();
    for poller in pollers {
        poller.stop().await;
    }
    Ok(())
}
