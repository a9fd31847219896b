use crate::commands::Command;
use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/dashboard", get(handlers::dashboard))
        .route("/fragments/states", get(handlers::states_fragment))
        .route("/fragments/tasks", get(handlers::tasks_fragment))
        .route("/database/delete", post(handlers::delete_database))
        .route("/storage/delete", post(handlers::delete_storage))
        .route(Command::AddDatabase.route(), post(handlers::add_database))
        .route(Command::AddStorage.route(), post(handlers::add_storage))
        .route(Command::CreateBackup.route(), post(handlers::create_backup))
        .route(Command::RestoreBackup.route(), post(handlers::restore_backup))
        .route(Command::DeleteBackup.route(), post(handlers::delete_backup))
        .route(Command::AddPlannedTask.route(), post(handlers::add_planned_task))
        .route("/cancel-task", post(handlers::cancel_task))
        .route("/api/session", get(handlers::session))
        .with_state(state)
}

/// Resolves once `signal` fires, cancelling `cancel`. If the signal cannot be
/// installed the service keeps running until it is killed.
pub async fn shutdown_on<F>(signal: F, cancel: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
    cancel.cancel();
}
