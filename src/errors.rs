use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures raised while talking to the backup backend or the preference store.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend answered {status} for {endpoint}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("backend body for {endpoint} is not valid JSON: {source}")]
    MalformedBody {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("login rejected with status {status} and a non-JSON body: {body}")]
    MalformedErrorBody { status: u16, body: String },

    #[error("row is missing attribute {0}")]
    MissingRowAttribute(&'static str),

    #[error("preference store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Http(_)
            | Self::UnexpectedStatus { .. }
            | Self::MalformedBody { .. }
            | Self::MalformedErrorBody { .. } => StatusCode::BAD_GATEWAY,
            Self::MissingRowAttribute(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::Json(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_failures_map_to_bad_gateway() {
        let err = ClientError::UnexpectedStatus {
            endpoint: "/cancel-task".to_string(),
            status: 500,
        };
        let app: AppError = err.into();
        assert_eq!(app.status, StatusCode::BAD_GATEWAY);
        assert!(app.message.contains("/cancel-task"));
    }

    #[test]
    fn missing_attribute_is_a_bad_request() {
        let app: AppError = ClientError::MissingRowAttribute("data-id").into();
        assert_eq!(app.status, StatusCode::BAD_REQUEST);
    }
}
