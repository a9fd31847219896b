use crate::api::BackupApi;
use crate::effects::{Effect, Effects};
use crate::errors::{ClientError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

pub const ID_ATTRIBUTE: &str = "data-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Database,
    Storage,
}

impl ResourceKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Database => "/database",
            Self::Storage => "/storage",
        }
    }

    pub fn row_class(self) -> &'static str {
        match self {
            Self::Database => "databaseItem",
            Self::Storage => "storageItem",
        }
    }

    pub fn type_attribute(self) -> &'static str {
        match self {
            Self::Database => "data-database-type",
            Self::Storage => "data-storage-type",
        }
    }

    pub fn type_param(self) -> &'static str {
        match self {
            Self::Database => "databaseType",
            Self::Storage => "storageType",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Self::Database => "Database was successfully deleted",
            Self::Storage => "Storage was successfully deleted",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::Database => "Database deletion error",
            Self::Storage => "Storage deletion error",
        }
    }
}

/// Attributes of the row container enclosing a remove button.
#[derive(Debug, Clone, Default)]
pub struct RowContainer {
    attributes: BTreeMap<String, String>,
}

impl RowContainer {
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionTarget {
    pub kind: ResourceKind,
    pub id: String,
    pub type_value: String,
}

impl DeletionTarget {
    pub fn from_row(kind: ResourceKind, row: &RowContainer) -> Result<Self> {
        let id = row
            .attr(ID_ATTRIBUTE)
            .ok_or(ClientError::MissingRowAttribute(ID_ATTRIBUTE))?;
        let type_value = row
            .attr(kind.type_attribute())
            .ok_or(ClientError::MissingRowAttribute(kind.type_attribute()))?;
        Ok(Self {
            kind,
            id: id.to_string(),
            type_value: type_value.to_string(),
        })
    }
}

pub struct DeletionHandler<A> {
    api: Arc<A>,
    kind: ResourceKind,
}

impl<A: BackupApi> DeletionHandler<A> {
    pub fn new(api: Arc<A>, kind: ResourceKind) -> Self {
        Self { api, kind }
    }

    /// Every call issues its own request; there is no debouncing and nothing is
    /// removed optimistically.
    pub async fn remove(&self, row: &RowContainer) -> Effects {
        let target = match DeletionTarget::from_row(self.kind, row) {
            Ok(target) => target,
            Err(err) => {
                warn!(kind = ?self.kind, "cannot delete row: {err}");
                return Effects::alert(self.kind.failure_message());
            }
        };

        match self.api.delete_resource(&target).await {
            Ok(()) => Effects::alert(self.kind.success_message()).then(Effect::Reload),
            Err(err) => {
                warn!(kind = ?self.kind, id = %target.id, "deletion failed: {err}");
                Effects::alert(self.kind.failure_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeApi;

    fn database_row() -> RowContainer {
        RowContainer::default()
            .with("class", "databaseItem")
            .with(ID_ATTRIBUTE, "main-db")
            .with("data-database-type", "postgres")
    }

    #[tokio::test]
    async fn each_click_sends_one_delete_with_row_attributes() {
        let api = Arc::new(FakeApi::default());
        let handler = DeletionHandler::new(Arc::clone(&api), ResourceKind::Database);

        let effects = handler.remove(&database_row()).await;
        assert_eq!(
            effects.alerts().collect::<Vec<_>>(),
            vec!["Database was successfully deleted"]
        );
        assert!(effects.reloads());

        handler.remove(&database_row()).await;
        let deletions = api.deletions();
        assert_eq!(deletions.len(), 2);
        assert_eq!(
            deletions[0],
            DeletionTarget {
                kind: ResourceKind::Database,
                id: "main-db".to_string(),
                type_value: "postgres".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn failure_alerts_without_reload() {
        let api = Arc::new(FakeApi::default().failing());
        let handler = DeletionHandler::new(Arc::clone(&api), ResourceKind::Storage);
        let row = RowContainer::default()
            .with(ID_ATTRIBUTE, "dropbox-1")
            .with("data-storage-type", "dropbox");

        let effects = handler.remove(&row).await;
        assert_eq!(
            effects.alerts().collect::<Vec<_>>(),
            vec!["Storage deletion error"]
        );
        assert!(!effects.reloads());
        assert_eq!(api.deletions().len(), 1);
    }

    #[tokio::test]
    async fn row_without_type_attribute_sends_nothing() {
        let api = Arc::new(FakeApi::default());
        let handler = DeletionHandler::new(Arc::clone(&api), ResourceKind::Storage);
        let row = RowContainer::default().with(ID_ATTRIBUTE, "dropbox-1");

        let effects = handler.remove(&row).await;
        assert_eq!(
            effects.alerts().collect::<Vec<_>>(),
            vec!["Storage deletion error"]
        );
        assert!(api.deletions().is_empty());
    }
}
