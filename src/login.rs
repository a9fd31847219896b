use crate::api::{BackupApi, LoginReply};
use crate::effects::{Effect, Effects};
use crate::errors::{ClientError, Result};
use crate::models::{Credentials, LoginFailure};
use crate::session::UiSession;
use crate::storage::PreferenceStore;
use std::sync::Arc;
use tracing::{info, warn};

pub const DASHBOARD_ROUTE: &str = "/dashboard";

pub struct LoginHandler<A, S> {
    api: Arc<A>,
    session: UiSession<S>,
}

impl<A: BackupApi, S: PreferenceStore> LoginHandler<A, S> {
    pub fn new(api: Arc<A>, session: UiSession<S>) -> Self {
        Self { api, session }
    }

    /// Field values are forwarded verbatim; emptiness and format are the backend's
    /// concern. A rejection whose body is not JSON is returned as an error.
    pub async fn submit(&self, credentials: Credentials) -> Result<Effects> {
        let reply = match self.api.login(&credentials).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("login request failed: {err}");
                return Ok(Effects::alert(err.to_string()));
            }
        };

        match reply {
            LoginReply::Accepted => {
                info!(login = %credentials.login, "login accepted");
                self.session.remember_login(&credentials.login).await?;
                Ok(Effect::Navigate(DASHBOARD_ROUTE.to_string()).into())
            }
            LoginReply::Rejected { status, body } => {
                let failure: LoginFailure = serde_json::from_str(&body)
                    .map_err(|_| ClientError::MalformedErrorBody { status, body })?;
                info!(status, "login rejected");
                Ok(Effects::alert(failure.error))
            }
        }
    }
}
