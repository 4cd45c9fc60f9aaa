mod refresh;
mod request;

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::ApiConfig,
    error::{AppError, Result},
    session::SessionStore,
};

pub use refresh::{REFRESH_PATH, TokenRefresher};
pub use request::{ApiRequest, FileUpload, MultipartForm, RequestBody};

/// HTTP client for the admin API.
///
/// Attaches the bearer token from the session to every request. When the API
/// answers 401 and a refresh token is available, the request waits for a
/// single shared refresh and is replayed once with the new token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    session: SessionStore,
    refresher: TokenRefresher,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(base_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid API base URL `{}`: {}", base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("shop-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url),
            session,
            refresher: TokenRefresher::new(),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let body = self.send_value(request).await?;
        serde_json::from_value(body).map_err(|e| {
            AppError::InternalError(format!(
                "Unexpected response from {}: {}",
                request.path, e
            ))
        })
    }

    pub async fn send_value(&self, request: &ApiRequest) -> Result<Value> {
        let request_id = Uuid::new_v4();
        let (token, generation) = self.session.credentials();
        let response = self.dispatch(request, token.as_deref(), request_id).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return read_body(response).await;
        }
        // A token change since sending means another request already refreshed
        // (or failed to); the refresher knows which.
        let stale = self.session.generation() != generation;
        if !stale && self.session.refresh_token().is_none() {
            return read_body(response).await;
        }

        tracing::debug!(%request_id, path = %request.path, "Unauthorized, waiting for token refresh");
        let fresh = self
            .refresher
            .refresh(&self.http, &self.base_url, &self.session, generation)
            .await?;

        let retry = self.dispatch(request, Some(&fresh), request_id).await?;
        read_body(retry).await
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        request_id: Uuid,
    ) -> Result<reqwest::Response> {
        tracing::debug!(
            %request_id,
            method = %request.method,
            path = %request.path,
            "API request"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path))
            .header("x-request-id", request_id.to_string());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(form) => builder.multipart(form.build()?),
        };

        Ok(builder.send().await?)
    }
}

/// Decodes a response body, turning non-2xx statuses into errors that carry
/// the server's `error`/`message` text.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(error_from_body(status, &text));
    }

    if text.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_str(&text)
        .map_err(|e| AppError::InternalError(format!("API returned invalid JSON: {}", e)))
}

fn error_from_body(status: StatusCode, text: &str) -> AppError {
    let message = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| {
            ["error", "message"]
                .iter()
                .find_map(|key| body.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    AppError::from_status(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_from_body() {
        let err = error_from_body(StatusCode::CONFLICT, r#"{"error":"Slug exists"}"#);
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Slug exists"));

        let err = error_from_body(StatusCode::NOT_FOUND, "<html>nope</html>");
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Not Found"));
    }

    #[test]
    fn rejects_bad_base_url() {
        let config = ApiConfig::new("not a url");
        assert!(matches!(
            ApiClient::new(&config, SessionStore::in_memory()),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn joins_paths() {
        let client =
            ApiClient::new(&ApiConfig::new("http://shop.test/api/"), SessionStore::in_memory())
                .unwrap();
        assert_eq!(client.url("/products/get.php"), "http://shop.test/api/products/get.php");
        assert_eq!(client.url("brands/get.php"), "http://shop.test/api/brands/get.php");
    }
}
