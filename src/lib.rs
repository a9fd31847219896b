pub mod api;
pub mod app;
pub mod commands;
pub mod config;
pub mod deletion;
pub mod effects;
pub mod errors;
pub mod handlers;
pub mod login;
pub mod models;
pub mod poller;
pub mod session;
pub mod state;
pub mod storage;
pub mod toggle;
pub mod ui;
pub mod view;

#[cfg(test)]
mod fake;

pub use app::router;
pub use config::DashboardConfig;
pub use state::AppState;
pub use storage::FileStore;
