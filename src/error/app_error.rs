use http::StatusCode;
use std::fmt;

use crate::forms::FieldErrors;

#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    HttpError(reqwest::Error),
    Api { status: StatusCode, message: String },
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Validation(FieldErrors),
    SessionExpired,
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::HttpError(e) => write!(f, "Network error: {}", e),
            AppError::Api { status, message } => write!(f, "API error ({}): {}", status, message),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            AppError::SessionExpired => write!(f, "Session expired, please sign in again"),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Maps a non-success API response onto an error variant.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
            StatusCode::FORBIDDEN => AppError::Forbidden(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::BadRequest(message)
            }
            StatusCode::CONFLICT => AppError::Conflict(message),
            _ => AppError::Api { status, message },
        }
    }

    /// Transport failures and server-side 5xx responses are worth one more attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::HttpError(e) => e.is_timeout() || e.is_connect(),
            AppError::Api { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    /// The message the server sent, if the error came from an API response.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Api { message, .. }
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::NotFound(message)
            | AppError::BadRequest(message)
            | AppError::Conflict(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Server message when there is one, otherwise the given fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Validation(errors) => errors.to_string(),
            AppError::SessionExpired => self.to_string(),
            _ => self
                .server_message()
                .filter(|msg| !msg.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpError(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("Invalid JSON: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("I/O error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        assert!(matches!(
            AppError::from_status(StatusCode::UNAUTHORIZED, "expired".into()),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            AppError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "bad".into()),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            AppError::from_status(StatusCode::BAD_GATEWAY, "down".into()),
            AppError::Api { .. }
        ));
    }

    #[test]
    fn user_message_prefers_server_text() {
        let err = AppError::Conflict("Slug already taken".into());
        assert_eq!(err.user_message("Failed to create brand"), "Slug already taken");

        let err = AppError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::new(),
        };
        assert_eq!(err.user_message("Failed to create brand"), "Failed to create brand");
    }

    #[test]
    fn only_server_errors_are_transient() {
        let err = AppError::Api {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "busy".into(),
        };
        assert!(err.is_transient());
        assert!(!AppError::NotFound("gone".into()).is_transient());
        assert!(!AppError::SessionExpired.is_transient());
    }
}
