use crate::api::BackupApi;
use crate::errors::Result;
use crate::view::{
    TableBody, TaskTemplate, render_state_rows, render_task_rows, state_rows, task_rows,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub type SharedTable = Arc<Mutex<TableBody>>;

/// A data source that can be fetched and rendered into table-body markup.
pub trait Feed: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn fetch_markup(&self) -> impl Future<Output = Result<String>> + Send;
}

pub struct StateFeed<A> {
    api: Arc<A>,
}

impl<A> StateFeed<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

impl<A: BackupApi> Feed for StateFeed<A> {
    fn name(&self) -> &'static str {
        "states"
    }

    async fn fetch_markup(&self) -> Result<String> {
        let records = self.api.fetch_states().await?;
        Ok(render_state_rows(&state_rows(&records)))
    }
}

pub struct TaskFeed<A> {
    api: Arc<A>,
    template: TaskTemplate,
}

impl<A> TaskFeed<A> {
    pub fn new(api: Arc<A>, template: TaskTemplate) -> Self {
        Self { api, template }
    }
}

impl<A: BackupApi> Feed for TaskFeed<A> {
    fn name(&self) -> &'static str {
        "tasks"
    }

    async fn fetch_markup(&self) -> Result<String> {
        let records = self.api.fetch_tasks().await?;
        Ok(render_task_rows(&task_rows(&records), self.template))
    }
}

/// Runs one fetch-and-render cycle. Failures only log; the table keeps what it had.
pub async fn poll_once<F: Feed>(feed: &F, table: &SharedTable) -> bool {
    match feed.fetch_markup().await {
        Ok(markup) => {
            let replaced = table.lock().await.replace(markup);
            debug!(feed = feed.name(), replaced, "poll complete");
            replaced
        }
        Err(err) => {
            warn!(feed = feed.name(), "poll failed: {err}");
            false
        }
    }
}

/// Handle to a running poller. Dropping it does not stop the task; call `stop`.
pub struct PollerHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl PollerHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Returns `false` when the task had already died, e.g. from a panic in its feed.
    pub async fn stop(self) -> bool {
        self.cancel.cancel();
        match self.join.await {
            Ok(()) => true,
            Err(err) => {
                warn!("poller ended abnormally: {err}");
                false
            }
        }
    }
}

pub struct Poller<F> {
    feed: F,
    table: SharedTable,
    interval: Duration,
}

impl<F: Feed> Poller<F> {
    pub fn new(feed: F, table: SharedTable, interval: Duration) -> Self {
        Self {
            feed,
            table,
            interval,
        }
    }

    /// Polls immediately, then waits `interval` after each completed cycle, so two
    /// requests for the same feed never overlap.
    pub fn start(self, cancel: CancellationToken) -> PollerHandle {
        let token = cancel.clone();
        let join = tokio::spawn(async move {
            info!(feed = self.feed.name(), interval = ?self.interval, "poller started");
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = poll_once(&self.feed, &self.table) => {}
                }
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }
            info!(feed = self.feed.name(), "poller stopped");
        });
        PollerHandle { cancel, join }
    }
}
