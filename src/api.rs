use crate::commands::{Command, FormFields};
use crate::deletion::DeletionTarget;
use crate::errors::{ClientError, Result};
use crate::models::{BackupStateRecord, BackupTaskRecord, Credentials};
use reqwest::{Client, Method, Response, redirect::Policy};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::info;

pub const STATES_ENDPOINT: &str = "/api/get-states";
pub const TASKS_ENDPOINT: &str = "/api/get-tasks";
pub const LOGIN_ENDPOINT: &str = "/api/login";
pub const CANCEL_TASK_ENDPOINT: &str = "/cancel-task";
pub const CANCEL_TASK_FIELD: &str = "taskId";

/// Outcome of a login attempt that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginReply {
    Accepted,
    Rejected { status: u16, body: String },
}

/// The backend as seen by the dashboard. Handlers and pollers are generic over this so
/// they can be driven by an in-memory fake.
pub trait BackupApi: Send + Sync + 'static {
    fn delete_resource(&self, target: &DeletionTarget) -> impl Future<Output = Result<()>> + Send;

    fn fetch_states(&self) -> impl Future<Output = Result<Vec<BackupStateRecord>>> + Send;

    fn fetch_tasks(&self) -> impl Future<Output = Result<Vec<BackupTaskRecord>>> + Send;

    fn login(&self, credentials: &Credentials) -> impl Future<Output = Result<LoginReply>> + Send;

    fn cancel_task(&self, task_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn send_command(
        &self,
        command: Command,
        fields: &FormFields,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpBackupApi {
    client: Client,
    base_url: String,
}

impl HttpBackupApi {
    /// Redirects are not followed: the backend answers form posts with a redirect to its
    /// own dashboard, which counts as success here.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.client.get(self.url(endpoint)).send().await?;
        let response = accepted(endpoint, response)?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::MalformedBody {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

fn accepted(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() || status.is_redirection() {
        Ok(response)
    } else {
        Err(ClientError::UnexpectedStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        })
    }
}

impl BackupApi for HttpBackupApi {
    async fn delete_resource(&self, target: &DeletionTarget) -> Result<()> {
        let endpoint = target.kind.endpoint();
        info!(endpoint, id = %target.id, "deleting resource");
        let response = self
            .client
            .delete(self.url(endpoint))
            .query(&[
                ("id", target.id.as_str()),
                (target.kind.type_param(), target.type_value.as_str()),
            ])
            .send()
            .await?;
        accepted(endpoint, response)?;
        Ok(())
    }

    async fn fetch_states(&self) -> Result<Vec<BackupStateRecord>> {
        self.get_json(STATES_ENDPOINT).await
    }

    async fn fetch_tasks(&self) -> Result<Vec<BackupTaskRecord>> {
        self.get_json(TASKS_ENDPOINT).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginReply> {
        let response = self
            .client
            .post(self.url(LOGIN_ENDPOINT))
            .json(credentials)
            .send()
            .await?;
        let status = response.status();
        // Form login answers a good password with a redirect to the dashboard.
        if status.is_success() || status.is_redirection() {
            return Ok(LoginReply::Accepted);
        }
        let body = response.text().await?;
        Ok(LoginReply::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    async fn cancel_task(&self, task_id: &str) -> Result<()> {
        info!(task_id, "forwarding task cancellation");
        let response = self
            .client
            .post(self.url(CANCEL_TASK_ENDPOINT))
            .form(&[(CANCEL_TASK_FIELD, task_id)])
            .send()
            .await?;
        accepted(CANCEL_TASK_ENDPOINT, response)?;
        Ok(())
    }

    async fn send_command(&self, command: Command, fields: &FormFields) -> Result<()> {
        let endpoint = command.endpoint();
        info!(endpoint, ?command, "forwarding command");
        let request = self.client.request(command.method(), self.url(endpoint));
        let request = if command.method() == Method::DELETE {
            request.query(fields)
        } else {
            request.form(fields)
        };
        accepted(endpoint, request.send().await?)?;
        Ok(())
    }
}
