use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Claims the API puts in its access tokens. Only `exp` is relied upon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: Option<i64>,
}

/// Reads the claims of an access token without checking its signature.
///
/// The signing secret lives on the server; callers only use this to report
/// when the current session expires.
pub fn peek_claims(token: &str) -> Result<Claims> {
    let header = decode_header(token)
        .map_err(|e| AppError::BadRequest(format!("Invalid token: {}", e)))?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::BadRequest(format!("Invalid token: {}", e)))
}

pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    peek_claims(token)
        .ok()
        .and_then(|claims| claims.exp)
        .and_then(|exp| DateTime::from_timestamp(exp, 0))
}

pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    expires_at(token).is_some_and(|exp| exp <= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token_expiring_at(exp: i64) -> String {
        let claims = Claims {
            sub: Some(serde_json::json!(5)),
            email: Some("staff@example.com".into()),
            role: Some("employee".into()),
            exp: Some(exp),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
    }

    #[test]
    fn reads_claims_without_the_secret() {
        let token = token_expiring_at(1_900_000_000);
        let claims = peek_claims(&token).unwrap();

        assert_eq!(claims.email.as_deref(), Some("staff@example.com"));
        assert_eq!(claims.role.as_deref(), Some("employee"));
        assert_eq!(expires_at(&token).unwrap().timestamp(), 1_900_000_000);
    }

    #[test]
    fn expiry_check() {
        let token = token_expiring_at(1_000);
        assert!(is_expired(&token, Utc::now()));
        assert!(!is_expired("not-a-jwt", Utc::now()));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(peek_claims("abc.def").is_err());
    }
}
