use crate::{
    client::{ApiClient, ApiRequest},
    error::{AppError, Result},
    models::{LoginRequest, LoginResponse, SessionUser},
    session::DASHBOARD_ROLES,
};

pub const LOGIN_PATH: &str = "auth/login.php";

/// Signs in and stores the returned user and tokens.
///
/// Accounts outside the dashboard roles are rejected before anything is
/// stored.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<SessionUser> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let body = serde_json::to_value(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })?;
    let request = ApiRequest::post(LOGIN_PATH).json(body);
    let response: LoginResponse = client.send(&request).await?;

    if !DASHBOARD_ROLES.contains(&response.user.role) {
        tracing::warn!("Rejected sign-in for {} with role {}", email, response.user.role);
        return Err(AppError::Forbidden(format!(
            "Role `{}` cannot access the dashboard",
            response.user.role
        )));
    }

    let user = response.user.clone();
    client.session().login(response)?;
    Ok(user)
}

pub fn logout(client: &ApiClient) -> Result<()> {
    client.session().logout()
}
