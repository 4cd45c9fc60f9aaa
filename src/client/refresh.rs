use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    error::{AppError, Result},
    models::{RefreshRequest, RefreshResponse},
    session::SessionStore,
};

use super::read_body;

pub const REFRESH_PATH: &str = "auth/refresh.php";

/// Serialises access-token refreshes.
///
/// Requests that hit a 401 queue on the gate. The first one through performs
/// the refresh; the rest see that the session generation moved past the one
/// their request was sent with and replay with the token now in the store.
/// When the refresh failed they get the same error instead.
#[derive(Debug, Clone, Default)]
pub struct TokenRefresher {
    gate: Arc<Mutex<Option<RefreshFailure>>>,
}

/// Outcome of the last failed refresh, kept for the requests queued behind it.
#[derive(Debug)]
struct RefreshFailure {
    /// Session generation right after the failure logged the session out.
    generation: u64,
    error: AppError,
}

impl TokenRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh(
        &self,
        http: &reqwest::Client,
        base_url: &str,
        session: &SessionStore,
        failed_generation: u64,
    ) -> Result<String> {
        let mut last_failure = self.gate.lock().await;

        let (current, generation) = session.credentials();
        if generation != failed_generation {
            if let Some(failure) = &*last_failure {
                if failure.generation == generation {
                    return Err(shared_error(&failure.error));
                }
            }
            tracing::debug!("Token changed while waiting, replaying with current token");
            return current.ok_or(AppError::SessionExpired);
        }

        let refresh_token = session.refresh_token().ok_or(AppError::SessionExpired)?;
        tracing::info!("Access token rejected, refreshing");

        match request_access_token(http, base_url, &refresh_token).await {
            Ok(response) => {
                let access = response.access_token.unwrap_or_default();
                *last_failure = None;
                session.set_tokens(access.clone(), response.refresh_token)?;
                tracing::info!("Access token refreshed");
                Ok(access)
            }
            Err(e) => {
                tracing::warn!("Token refresh failed, signing out: {}", e);
                if let Err(logout_err) = session.logout() {
                    tracing::warn!("Failed to clear session: {}", logout_err);
                }
                *last_failure = Some(RefreshFailure {
                    generation: session.generation(),
                    error: shared_error(&e),
                });
                Err(e)
            }
        }
    }
}

async fn request_access_token(
    http: &reqwest::Client,
    base_url: &str,
    refresh_token: &str,
) -> Result<RefreshResponse> {
    let response = http
        .post(format!("{}/{}", base_url, REFRESH_PATH))
        .json(&RefreshRequest { refresh_token })
        .send()
        .await?;

    let body = read_body(response).await?;
    let parsed: RefreshResponse = serde_json::from_value(body)?;

    match parsed.access_token.as_deref() {
        Some(token) if !token.is_empty() => Ok(parsed),
        _ => Err(AppError::Unauthorized("No new token".to_string())),
    }
}

/// Copy of a refresh error for the queued requests. Transport errors cannot
/// be cloned and are passed on as `Unauthorized` with their message.
fn shared_error(error: &AppError) -> AppError {
    match error {
        AppError::ConfigError(m) => AppError::ConfigError(m.clone()),
        AppError::HttpError(e) => AppError::Unauthorized(format!("Token refresh failed: {}", e)),
        AppError::Api { status, message } => AppError::Api {
            status: *status,
            message: message.clone(),
        },
        AppError::Unauthorized(m) => AppError::Unauthorized(m.clone()),
        AppError::Forbidden(m) => AppError::Forbidden(m.clone()),
        AppError::NotFound(m) => AppError::NotFound(m.clone()),
        AppError::BadRequest(m) => AppError::BadRequest(m.clone()),
        AppError::Conflict(m) => AppError::Conflict(m.clone()),
        AppError::Validation(errors) => AppError::Validation(errors.clone()),
        AppError::SessionExpired => AppError::SessionExpired,
        AppError::InternalError(m) => AppError::InternalError(m.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn shared_errors_keep_variant_and_message() {
        let err = shared_error(&AppError::Unauthorized("Invalid refresh token".into()));
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid refresh token"));

        let err = shared_error(&AppError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: "down".into(),
        });
        assert!(matches!(
            err,
            AppError::Api { status: StatusCode::BAD_GATEWAY, ref message } if message == "down"
        ));
    }
}
