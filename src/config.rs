use crate::errors::{ClientError, Result};
use crate::poller::DEFAULT_POLL_INTERVAL;
use crate::view::TaskTemplate;
use std::{env, path::PathBuf, str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub port: u16,
    pub backend_url: String,
    pub prefs_path: PathBuf,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub task_template: TaskTemplate,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            backend_url: "http://127.0.0.1:8080".to_string(),
            prefs_path: PathBuf::from("data/preferences.json"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(10),
            task_template: TaskTemplate::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(port) = parsed::<u16>(&lookup, "PORT")? {
            config.port = port;
        }
        if let Some(url) = lookup("BACKEND_URL") {
            config.backend_url = url;
        }
        if let Some(path) = lookup("DASHBOARD_PREFS_PATH") {
            config.prefs_path = PathBuf::from(path);
        }
        if let Some(secs) = parsed::<u64>(&lookup, "POLL_INTERVAL_SECS")? {
            if secs == 0 {
                return Err(ClientError::Config(
                    "POLL_INTERVAL_SECS must be at least 1".to_string(),
                ));
            }
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = parsed::<u64>(&lookup, "REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(template) = lookup("TASK_TEMPLATE") {
            config.task_template = template.parse().map_err(ClientError::Config)?;
        }
        Ok(config)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("{key} has invalid value '{raw}'")))
        })
        .transpose()
}
