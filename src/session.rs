use crate::errors::Result;
use crate::models::SessionResponse;
use crate::storage::PreferenceStore;
use std::sync::Arc;

pub const ACTIVE_TAB_KEY: &str = "activeTab";
pub const LOGIN_KEY: &str = "login";
/// Cookie naming the browser a set of preferences belongs to.
pub const CLIENT_COOKIE: &str = "dashboard_client";

/// Client-side preferences: the last shown tab and the display-only login name.
/// Neither value is an authentication token.
pub struct UiSession<S> {
    store: Arc<S>,
    client: Option<String>,
}

impl<S> Clone for UiSession<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            client: self.client.clone(),
        }
    }
}

impl<S: PreferenceStore> UiSession<S> {
    /// Preferences of a single browser owning the whole store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            client: None,
        }
    }

    /// Preferences of one browser in a store shared by many; keys become
    /// `<client>/<key>`.
    pub fn for_client(store: Arc<S>, client: impl Into<String>) -> Self {
        Self {
            store,
            client: Some(client.into()),
        }
    }

    fn key(&self, key: &str) -> String {
        match &self.client {
            Some(client) => format!("{client}/{key}"),
            None => key.to_string(),
        }
    }

    pub async fn tab_shown(&self, href: &str) -> Result<()> {
        self.store.set(&self.key(ACTIVE_TAB_KEY), href).await
    }

    /// The tab to activate on page load, if one was ever shown.
    pub async fn restore_tab(&self) -> Option<String> {
        self.store
            .get(&self.key(ACTIVE_TAB_KEY))
            .await
            .filter(|href| !href.is_empty())
    }

    pub async fn remember_login(&self, login: &str) -> Result<()> {
        self.store.set(&self.key(LOGIN_KEY), login).await
    }

    pub async fn login(&self) -> Option<String> {
        self.store.get(&self.key(LOGIN_KEY)).await
    }

    pub async fn snapshot(&self) -> SessionResponse {
        SessionResponse {
            login: self.login().await,
            active_tab: self.restore_tab().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn no_stored_tab_means_no_activation() {
        let session = UiSession::new(Arc::new(MemoryStore::default()));
        assert_eq!(session.restore_tab().await, None);
    }

    #[tokio::test]
    async fn shown_tab_is_restored() {
        let store = Arc::new(MemoryStore::default());
        let session = UiSession::new(Arc::clone(&store));
        session.tab_shown("#storages").await.unwrap();
        session.tab_shown("#tasks").await.unwrap();

        let reloaded = UiSession::new(store);
        assert_eq!(reloaded.restore_tab().await.as_deref(), Some("#tasks"));
    }

    #[tokio::test]
    async fn snapshot_reports_both_keys() {
        let session = UiSession::new(Arc::new(MemoryStore::default()));
        session.remember_login("admin").await.unwrap();
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.login.as_deref(), Some("admin"));
        assert_eq!(snapshot.active_tab, None);
    }

    #[tokio::test]
    async fn clients_sharing_a_store_keep_their_own_values() {
        let store = Arc::new(MemoryStore::default());
        let first = UiSession::for_client(Arc::clone(&store), "a");
        let second = UiSession::for_client(Arc::clone(&store), "b");

        first.tab_shown("#storages").await.unwrap();
        first.remember_login("admin").await.unwrap();
        second.tab_shown("#tasks").await.unwrap();

        assert_eq!(first.restore_tab().await.as_deref(), Some("#storages"));
        assert_eq!(second.restore_tab().await.as_deref(), Some("#tasks"));
        assert_eq!(second.login().await, None);
        assert_eq!(store.get("a/activeTab").await.as_deref(), Some("#storages"));
    }
}
