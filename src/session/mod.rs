//! Signed-in user and tokens, persisted to a JSON file between runs.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use crate::{
    error::{AppError, Result},
    models::{LoginResponse, SessionUser, UserRole},
};

/// Roles allowed into the dashboard.
pub const DASHBOARD_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Employee];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    generation: u64,
}

/// Shared handle to the current session.
///
/// Every token change bumps a generation counter so the HTTP client can tell
/// whether a 401 was produced by the token it currently holds.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    path: Option<Arc<PathBuf>>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::with_session(Session::default(), None)
    }

    /// Loads the session file; a missing file means signed out.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let session = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Session::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::ConfigError(format!(
                    "Corrupt session file {}: {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Session::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self::with_session(session, Some(path)))
    }

    pub fn with_session(session: Session, path: Option<PathBuf>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                session,
                generation: 0,
            })),
            path: path.map(Arc::new),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref().map(PathBuf::as_path)
    }

    pub fn snapshot(&self) -> Session {
        self.read(|state| state.session.clone())
    }

    /// Current access token together with the generation it belongs to.
    pub fn credentials(&self) -> (Option<String>, u64) {
        self.read(|state| (state.session.access_token.clone(), state.generation))
    }

    pub fn generation(&self) -> u64 {
        self.read(|state| state.generation)
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(|state| state.session.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(|state| state.session.refresh_token.clone())
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.read(|state| state.session.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|state| state.session.access_token.is_some() && state.session.user.is_some())
    }

    pub fn login(&self, response: LoginResponse) -> Result<()> {
        tracing::info!("Signed in as {} ({})", response.user.email, response.user.role);
        self.update(|session| {
            *session = Session {
                user: Some(response.user),
                access_token: Some(response.access_token),
                refresh_token: Some(response.refresh_token),
            };
        })
    }

    /// Stores a new access token, keeping the current refresh token unless a
    /// new one is given.
    pub fn set_tokens(&self, access: String, refresh: Option<String>) -> Result<()> {
        self.update(|session| {
            session.access_token = Some(access);
            if let Some(refresh) = refresh {
                session.refresh_token = Some(refresh);
            }
        })
    }

    pub fn set_user(&self, user: SessionUser) -> Result<()> {
        self.update(|session| session.user = Some(user))
    }

    pub fn logout(&self) -> Result<()> {
        tracing::info!("Session cleared");
        self.update(|session| *session = Session::default())
    }

    /// Gate for protected commands: signed in, and in one of `roles`.
    pub fn authorize(&self, roles: &[UserRole]) -> Result<SessionUser> {
        let session = self.snapshot();
        let user = match (session.access_token, session.user) {
            (Some(_), Some(user)) => user,
            _ => {
                return Err(AppError::Unauthorized(
                    "Not signed in, run `shop-admin login` first".to_string(),
                ));
            }
        };

        if !roles.is_empty() && !roles.contains(&user.role) {
            return Err(AppError::Forbidden(format!(
                "Role `{}` cannot access the dashboard",
                user.role
            )));
        }

        Ok(user)
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn update(&self, f: impl FnOnce(&mut Session)) -> Result<()> {
        let snapshot = {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard.session);
            guard.generation += 1;
            guard.session.clone()
        };
        self.persist(&snapshot)
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_vec_pretty(session)?)?;
        tracing::debug!("Session saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_response(role: UserRole) -> LoginResponse {
        LoginResponse {
            user: SessionUser {
                id: 1,
                full_name: "Dana Staff".into(),
                email: "dana@example.com".into(),
                role,
            },
            access_token: "access-1".into(),
            refresh_token: "refresh-1".into(),
        }
    }

    #[test]
    fn persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::load(&path).unwrap();
        assert!(!store.is_authenticated());

        store.login(login_response(UserRole::Admin)).unwrap();
        store.set_tokens("access-2".into(), None).unwrap();

        let reloaded = SessionStore::load(&path).unwrap();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.access_token().as_deref(), Some("access-2"));
        assert_eq!(reloaded.refresh_token().as_deref(), Some("refresh-1"));
    }

    #[test]
    fn every_change_bumps_generation() {
        let store = SessionStore::in_memory();
        let start = store.generation();

        store.login(login_response(UserRole::Employee)).unwrap();
        store.set_tokens("access-2".into(), Some("refresh-2".into())).unwrap();
        store.logout().unwrap();

        assert_eq!(store.generation(), start + 3);
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn authorize_checks_session_and_role() {
        let store = SessionStore::in_memory();
        assert!(matches!(
            store.authorize(DASHBOARD_ROLES),
            Err(AppError::Unauthorized(_))
        ));

        store.login(login_response(UserRole::Customer)).unwrap();
        assert!(matches!(
            store.authorize(DASHBOARD_ROLES),
            Err(AppError::Forbidden(_))
        ));

        store.login(login_response(UserRole::Employee)).unwrap();
        assert_eq!(store.authorize(DASHBOARD_ROLES).unwrap().id, 1);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"{not json").unwrap();

        assert!(matches!(
            SessionStore::load(&path),
            Err(AppError::ConfigError(_))
        ));
    }
}
