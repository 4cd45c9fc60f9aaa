use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;

use crate::{
    client::RequestBody,
    error::Result,
    forms::{FieldErrors, FormMode, non_empty},
    models::{User, UserRole},
};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("failed to create the email pattern")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\d\s\-\+\(\)]+$").expect("failed to create the phone pattern")
});

#[derive(Debug, Clone)]
pub struct UserForm {
    pub full_name: String,
    pub email: String,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            password: None,
            phone: None,
            role: UserRole::Employee,
            is_active: true,
        }
    }
}

impl From<&User> for UserForm {
    fn from(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            password: None,
            phone: user.phone.clone(),
            role: user.role,
            is_active: user.is_active,
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

impl UserForm {
    pub fn validate(&self, mode: FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.add("full_name", "Full name is required");
        } else if full_name.chars().count() < 2 {
            errors.add("full_name", "Full name must be at least 2 characters");
        }

        let email = self.email.trim();
        if email.is_empty() {
            if mode == FormMode::Create {
                errors.add("email", "Email is required");
            }
        } else if !is_valid_email(email) {
            errors.add("email", "Please enter a valid email address");
        }

        match self.password.as_deref().filter(|p| !p.is_empty()) {
            None if mode == FormMode::Create => {
                errors.add("password", "Password is required for new users")
            }
            Some(password) if password.chars().count() < 6 => {
                errors.add("password", "Password must be at least 6 characters")
            }
            _ => {}
        }

        if let Some(phone) = non_empty(self.phone.as_deref()) {
            if !is_valid_phone(phone) {
                errors.add("phone", "Please enter a valid phone number");
            }
        }

        errors
    }

    /// The password is only sent when given; on edits a blank email is left out.
    pub fn into_body(self, mode: FormMode) -> Result<RequestBody> {
        self.validate(mode).into_result()?;

        let mut body = json!({
            "full_name": self.full_name.trim(),
            "phone": non_empty(self.phone.as_deref()),
            "role": self.role.as_str(),
            "is_active": self.is_active,
        });
        if let Some(email) = non_empty(Some(&self.email)) {
            body["email"] = Value::from(email);
        }
        if let Some(password) = self.password.filter(|p| !p.is_empty()) {
            body["password"] = Value::from(password);
        }
        Ok(RequestBody::Json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rules() {
        let errors = UserForm {
            full_name: "A".into(),
            email: "nope@".into(),
            phone: Some("555-abc".into()),
            ..Default::default()
        }
        .validate(FormMode::Create);

        assert_eq!(
            errors.get("full_name"),
            Some("Full name must be at least 2 characters")
        );
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(errors.get("password"), Some("Password is required for new users"));
        assert_eq!(errors.get("phone"), Some("Please enter a valid phone number"));
    }

    #[test]
    fn edit_allows_missing_email_and_password() {
        let form = UserForm {
            full_name: "Nino Beridze".into(),
            phone: Some("+995 (555) 12-34-56".into()),
            ..Default::default()
        };
        assert!(form.validate(FormMode::Edit).is_empty());

        let RequestBody::Json(body) = form.into_body(FormMode::Edit).unwrap() else {
            panic!("expected json body");
        };
        assert!(body.get("email").is_none());
        assert!(body.get("password").is_none());
        assert_eq!(body["role"], "employee");

        let short = UserForm {
            full_name: "Nino".into(),
            password: Some("12345".into()),
            ..Default::default()
        };
        assert_eq!(
            short.validate(FormMode::Edit).get("password"),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("staff@shop.ge"));
        assert!(!is_valid_email("staff shop@ge.com"));
        assert!(!is_valid_email("staff@shop"));
    }
}
