use crate::api::HttpBackupApi;
use crate::config::DashboardConfig;
use crate::poller::{Poller, PollerHandle, SharedTable, StateFeed, TaskFeed};
use crate::session::UiSession;
use crate::storage::FileStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<HttpBackupApi>,
    pub prefs: Arc<FileStore>,
    pub states: SharedTable,
    pub tasks: SharedTable,
    /// Alert raised by a browser's last command, shown once on its next page render.
    notices: Arc<Mutex<HashMap<String, String>>>,
}

impl AppState {
    pub fn new(api: Arc<HttpBackupApi>, prefs: Arc<FileStore>) -> Self {
        Self {
            api,
            prefs,
            states: SharedTable::default(),
            tasks: SharedTable::default(),
            notices: Arc::default(),
        }
    }

    pub fn session(&self, client: &str) -> UiSession<FileStore> {
        UiSession::for_client(Arc::clone(&self.prefs), client)
    }

    pub async fn post_notice(&self, client: &str, message: &str) {
        self.notices
            .lock()
            .await
            .insert(client.to_string(), message.to_string());
    }

    pub async fn take_notice(&self, client: &str) -> Option<String> {
        self.notices.lock().await.remove(client)
    }

    pub fn start_pollers(
        &self,
        config: &DashboardConfig,
        cancel: CancellationToken,
    ) -> Vec<PollerHandle> {
        vec![
            Poller::new(
                StateFeed::new(Arc::clone(&self.api)),
                Arc::clone(&self.states),
                config.poll_interval,
            )
            .start(cancel.child_token()),
            Poller::new(
                TaskFeed::new(Arc::clone(&self.api), config.task_template),
                Arc::clone(&self.tasks),
                config.poll_interval,
            )
            .start(cancel.child_token()),
        ]
    }
}
