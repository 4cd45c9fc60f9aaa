#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use shop_admin::{
    ApiClient,
    config::ApiConfig,
    models::{SessionUser, UserRole},
    session::{Session, SessionStore},
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const LOGIN_PATH: &str = "/api/auth/login.php";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// In-process stand-in for the shop API.
///
/// Every path except login and refresh requires `Bearer <valid_token>`.
/// Unknown paths answer with `{"success": true, "data": []}` unless a canned
/// response was registered.
pub struct MockState {
    pub valid_token: Mutex<String>,
    /// Token handed out by the refresh endpoint; `None` makes it fail.
    pub refresh_token_reply: Mutex<Option<String>>,
    /// When false the refreshed token is still rejected.
    pub accept_refreshed: AtomicBool,
    /// When true the refresh endpoint answers 200 with no token in the body.
    pub refresh_empty: AtomicBool,
    pub refresh_calls: AtomicUsize,
    pub refresh_delay: Duration,
    pub responses: Mutex<HashMap<String, Value>>,
    pub failures: Mutex<HashMap<String, (StatusCode, usize)>>,
    pub requests: Mutex<Vec<Recorded>>,
}

pub struct MockApi {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockApi {
    pub async fn start(valid_token: &str) -> Self {
        let state = Arc::new(MockState {
            valid_token: Mutex::new(valid_token.to_string()),
            refresh_token_reply: Mutex::new(Some("fresh-token".to_string())),
            accept_refreshed: AtomicBool::new(true),
            refresh_empty: AtomicBool::new(false),
            refresh_calls: AtomicUsize::new(0),
            refresh_delay: Duration::from_millis(100),
            responses: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/auth/refresh.php", post(refresh))
            .fallback(record)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn respond(&self, path: &str, body: Value) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(path.to_string(), body);
    }

    /// Fails the next `times` requests to `path` with `status`.
    pub fn fail(&self, path: &str, status: StatusCode, times: usize) {
        self.state
            .failures
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, times));
    }

    pub fn fail_refresh(&self) {
        *self.state.refresh_token_reply.lock().unwrap() = None;
    }

    pub fn refresh_without_token(&self) {
        self.state.refresh_empty.store(true, Ordering::SeqCst);
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().unwrap()
    }

    pub fn client(&self, session: SessionStore) -> ApiClient {
        ApiClient::new(&ApiConfig::new(self.base_url.clone()), session).unwrap()
    }
}

pub fn staff(role: UserRole) -> SessionUser {
    SessionUser {
        id: 7,
        full_name: "Dana Staff".into(),
        email: "dana@shop.test".into(),
        role,
    }
}

pub fn signed_in(access: &str, refresh: Option<&str>) -> SessionStore {
    SessionStore::with_session(
        Session {
            user: Some(staff(UserRole::Admin)),
            access_token: Some(access.to_string()),
            refresh_token: refresh.map(str::to_string),
        },
        None,
    )
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(state.refresh_delay).await;

    if body.get("refresh_token").and_then(Value::as_str).is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Missing token" }))).into_response();
    }

    if state.refresh_empty.load(Ordering::SeqCst) {
        return Json(json!({})).into_response();
    }

    let reply = state.refresh_token_reply.lock().unwrap().clone();
    match reply {
        Some(token) => {
            if state.accept_refreshed.load(Ordering::SeqCst) {
                *state.valid_token.lock().unwrap() = token.clone();
            }
            Json(json!({ "access_token": token })).into_response()
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid refresh token" })),
        )
            .into_response(),
    }
}

async fn record(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: header_value(header::CONTENT_TYPE),
        authorization: header_value(header::AUTHORIZATION),
        body: body.to_vec(),
    };
    state.requests.lock().unwrap().push(recorded.clone());

    if recorded.path != LOGIN_PATH {
        let expected = format!("Bearer {}", state.valid_token.lock().unwrap());
        if recorded.authorization.as_deref() != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Token expired" })),
            )
                .into_response();
        }
    }

    {
        let mut failures = state.failures.lock().unwrap();
        if let Some((status, remaining)) = failures.get_mut(&recorded.path) {
            if *remaining > 0 {
                *remaining -= 1;
                return (*status, Json(json!({ "error": "Server exploded" }))).into_response();
            }
        }
    }

    let body = state
        .responses
        .lock()
        .unwrap()
        .get(&recorded.path)
        .cloned()
        .unwrap_or_else(|| json!({ "success": true, "data": [] }));
    Json(body).into_response()
}
