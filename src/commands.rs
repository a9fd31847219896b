use crate::api::BackupApi;
use crate::effects::{Effect, Effects};
use reqwest::Method;
use std::sync::Arc;
use tracing::{info, warn};

/// Submitted form fields in order, repeated names included.
pub type FormFields = Vec<(String, String)>;

/// Form commands the dashboard relays to the backend on the browser's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddDatabase,
    AddStorage,
    CreateBackup,
    RestoreBackup,
    DeleteBackup,
    AddPlannedTask,
}

impl Command {
    /// Dashboard route the form posts to.
    pub fn route(self) -> &'static str {
        match self {
            Self::AddDatabase => "/database/add",
            Self::AddStorage => "/storage/add",
            Self::CreateBackup => "/create-backup",
            Self::RestoreBackup => "/restore-backup",
            Self::DeleteBackup => "/delete-backup",
            Self::AddPlannedTask => "/planned-task",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Self::AddDatabase => "/database",
            Self::AddStorage => "/storage",
            Self::CreateBackup => "/create-backup",
            Self::RestoreBackup => "/restore-backup",
            Self::DeleteBackup => "/delete-backup",
            Self::AddPlannedTask => "/planned-task",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Self::DeleteBackup => Method::DELETE,
            _ => Method::POST,
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::AddDatabase => &["settingsName", "databaseType"],
            Self::AddStorage => &["settingsName", "storageType"],
            Self::CreateBackup => &["databaseSettingsName", "storageSettingsName"],
            Self::RestoreBackup => &["backupId", "databaseSettingsName", "storageSettingsName"],
            Self::DeleteBackup => &["backupId"],
            Self::AddPlannedTask => &[
                "taskType",
                "databaseSettingsName",
                "storageSettingsNameList",
                "interval",
            ],
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Self::AddDatabase => "Database was successfully added",
            Self::AddStorage => "Storage was successfully added",
            Self::CreateBackup => "Backup creation started",
            Self::RestoreBackup => "Backup restoration started",
            Self::DeleteBackup => "Backup deletion started",
            Self::AddPlannedTask => "Planned task was successfully added",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::AddDatabase => "Database adding error",
            Self::AddStorage => "Storage adding error",
            Self::CreateBackup => "Backup creation error",
            Self::RestoreBackup => "Backup restoration error",
            Self::DeleteBackup => "Backup deletion error",
            Self::AddPlannedTask => "Planned task adding error",
        }
    }

    /// Checks required fields and rewrites the form into the shape the backend binds.
    /// Returns the first missing field on failure.
    pub fn prepare(self, fields: FormFields) -> Result<FormFields, &'static str> {
        let fields: FormFields = fields
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();
        if let Some(missing) = self
            .required_fields()
            .iter()
            .find(|required| !fields.iter().any(|(name, _)| name == *required))
        {
            return Err(*missing);
        }
        Ok(match self {
            Self::CreateBackup => backup_creation_properties(fields),
            _ => fields,
        })
    }
}

/// Each chosen storage becomes its own `backupCreationProperties[<storage>]` entry
/// carrying every selected processor.
fn backup_creation_properties(fields: FormFields) -> FormFields {
    let values = |wanted: &str| -> Vec<String> {
        fields
            .iter()
            .filter(|(name, _)| name == wanted)
            .map(|(_, value)| value.clone())
            .collect()
    };
    let processors = values("processors");

    let mut out = Vec::new();
    for database in values("databaseSettingsName") {
        out.push(("databaseSettingsName".to_string(), database));
    }
    for storage in values("storageSettingsName") {
        let prefix = format!("backupCreationProperties[{storage}]");
        out.push((format!("{prefix}.storageSettingsName"), storage.clone()));
        for processor in &processors {
            out.push((format!("{prefix}.processors"), processor.clone()));
        }
    }
    out
}

pub struct CommandHandler<A> {
    api: Arc<A>,
    command: Command,
}

impl<A: BackupApi> CommandHandler<A> {
    pub fn new(api: Arc<A>, command: Command) -> Self {
        Self { api, command }
    }

    pub async fn submit(&self, fields: FormFields) -> Effects {
        let fields = match self.command.prepare(fields) {
            Ok(fields) => fields,
            Err(missing) => {
                warn!(command = ?self.command, missing, "incomplete command form");
                return Effects::alert(self.command.failure_message());
            }
        };

        match self.api.send_command(self.command, &fields).await {
            Ok(()) => {
                info!(command = ?self.command, "command accepted");
                Effects::alert(self.command.success_message()).then(Effect::Reload)
            }
            Err(err) => {
                warn!(command = ?self.command, "command failed: {err}");
                Effects::alert(self.command.failure_message())
            }
        }
    }
}
