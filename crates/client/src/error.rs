use domain::services::RoleServiceError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),
}

/// Error payload returned by the dashboard API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ClientError {
    /// Builds a status error, preferring the API's own message.
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    body.trim().to_string()
                }
            });

        ClientError::Status { status, message }
    }
}

impl From<ClientError> for RoleServiceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status { status, message } => match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    RoleServiceError::Unauthorized(message)
                }
                StatusCode::NOT_FOUND => RoleServiceError::NotFound(message),
                StatusCode::CONFLICT => RoleServiceError::Conflict(message),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    RoleServiceError::Validation(message)
                }
                _ => RoleServiceError::Unexpected(format!("{}: {}", status, message)),
            },
            ClientError::Http(e) => RoleServiceError::Transport(e.to_string()),
            ClientError::InvalidUrl(msg) | ClientError::InvalidResponse(msg) => {
                RoleServiceError::Unexpected(msg)
            }
        }
    }
}
