use crate::api::{BackupApi, LoginReply};
use crate::commands::{Command, FormFields};
use crate::deletion::DeletionTarget;
use crate::errors::{ClientError, Result};
use crate::models::{BackupStateRecord, BackupTaskRecord, Credentials};
use std::collections::VecDeque;
use std::sync::Mutex;

fn unavailable(endpoint: &str) -> ClientError {
    ClientError::UnexpectedStatus {
        endpoint: endpoint.to_string(),
        status: 503,
    }
}

/// In-memory backend that records every call and replays scripted responses.
#[derive(Default)]
pub struct FakeApi {
    failing: bool,
    deletions: Mutex<Vec<DeletionTarget>>,
    logins: Mutex<Vec<Credentials>>,
    commands: Mutex<Vec<(Command, FormFields)>>,
    states: Mutex<VecDeque<Result<Vec<BackupStateRecord>>>>,
    tasks: Mutex<VecDeque<Result<Vec<BackupTaskRecord>>>>,
    login_reply: Mutex<Option<LoginReply>>,
}

impl FakeApi {
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn with_login_reply(self, reply: LoginReply) -> Self {
        *self.login_reply.lock().unwrap() = Some(reply);
        self
    }

    pub fn push_states(&self, reply: Result<Vec<BackupStateRecord>>) {
        self.states.lock().unwrap().push_back(reply);
    }

    pub fn push_tasks(&self, reply: Result<Vec<BackupTaskRecord>>) {
        self.tasks.lock().unwrap().push_back(reply);
    }

    pub fn deletions(&self) -> Vec<DeletionTarget> {
        self.deletions.lock().unwrap().clone()
    }

    pub fn logins(&self) -> Vec<Credentials> {
        self.logins.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<(Command, FormFields)> {
        self.commands.lock().unwrap().clone()
    }
}

impl BackupApi for FakeApi {
    async fn delete_resource(&self, target: &DeletionTarget) -> Result<()> {
        self.deletions.lock().unwrap().push(target.clone());
        if self.failing {
            return Err(unavailable(target.kind.endpoint()));
        }
        Ok(())
    }

    async fn fetch_states(&self) -> Result<Vec<BackupStateRecord>> {
        self.states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_tasks(&self) -> Result<Vec<BackupTaskRecord>> {
        self.tasks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginReply> {
        self.logins.lock().unwrap().push(credentials.clone());
        if self.failing {
            return Err(unavailable(crate::api::LOGIN_ENDPOINT));
        }
        Ok(self
            .login_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(LoginReply::Accepted))
    }

    async fn cancel_task(&self, _task_id: &str) -> Result<()> {
        if self.failing {
            return Err(unavailable(crate::api::CANCEL_TASK_ENDPOINT));
        }
        Ok(())
    }

    async fn send_command(&self, command: Command, fields: &FormFields) -> Result<()> {
        self.commands.lock().unwrap().push((command, fields.clone()));
        if self.failing {
            return Err(unavailable(command.endpoint()));
        }
        Ok(())
    }
}
