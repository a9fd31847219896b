use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupStateRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupTaskRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub interrupted: bool,
    pub time: String,
}

/// Task ids arrive as JSON numbers from the backend but are only ever echoed back, so
/// both numbers and strings are accepted and kept verbatim.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(value) => value.to_string(),
        RawId::Text(value) => value,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginFailure {
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionResponse {
    pub login: Option<String>,
    pub active_tab: Option<String>,
}
