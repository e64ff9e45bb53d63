//! Authentication context: the bearer token handed to every page and client.
//!
//! The token is opaque to the console. When it happens to be a JWT its claims
//! are read (without signature verification) to show who is signed in and to
//! treat an expired token as "not authenticated" before the backend does.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;

use crate::api::ApiError;

/// Claims the console looks at. Everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    pub sub: Option<String>,
    pub preferred_username: Option<String>,
    pub exp: Option<i64>,
}

/// Bearer token plus whatever could be learned from it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    claims: Option<TokenClaims>,
}

impl Session {
    /// Blank tokens count as absent.
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let claims = token.as_deref().and_then(decode_claims);
        Self { token, claims }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Display name of the signed-in principal, if the token names one.
    pub fn principal(&self) -> Option<&str> {
        let claims = self.claims.as_ref()?;
        claims
            .preferred_username
            .as_deref()
            .or(claims.sub.as_deref())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims
            .as_ref()
            .and_then(|c| c.exp)
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    fn bearer_at(&self, now: i64) -> Result<&str, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::NotAuthenticated)?;
        match self.claims.as_ref().and_then(|c| c.exp) {
            Some(exp) if exp <= now => Err(ApiError::NotAuthenticated),
            _ => Ok(token),
        }
    }

    /// Token to send, or [`ApiError::NotAuthenticated`] when absent or expired.
    pub fn bearer(&self) -> Result<&str, ApiError> {
        self.bearer_at(Utc::now().timestamp())
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_ok()
    }
}

fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        preferred_username: Option<&'a str>,
        exp: i64,
    }

    fn jwt(preferred_username: Option<&str>, exp: i64) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &Claims {
                sub: "subject-1",
                preferred_username,
                exp,
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    #[test]
    fn absent_or_blank_token_is_not_authenticated() {
        assert_eq!(Session::anonymous().bearer(), Err(ApiError::NotAuthenticated));
        assert!(!Session::new(Some("   ".into())).is_authenticated());
    }

    #[test]
    fn opaque_token_is_accepted() {
        let session = Session::new(Some("opaque-token\n".into()));
        assert_eq!(session.bearer(), Ok("opaque-token"));
        assert_eq!(session.principal(), None);
    }

    #[test]
    fn jwt_claims_are_read_without_verification() {
        let token = jwt(Some("ada"), 4_000_000_000);
        let session = Session::new(Some(token.clone()));
        assert_eq!(session.principal(), Some("ada"));
        assert_eq!(session.bearer(), Ok(token.as_str()));
        assert!(session.expires_at().is_some());

        let session = Session::new(Some(jwt(None, 4_000_000_000)));
        assert_eq!(session.principal(), Some("subject-1"));
    }

    #[test]
    fn expired_jwt_is_not_authenticated() {
        let session = Session::new(Some(jwt(Some("ada"), 1_000)));
        assert_eq!(session.bearer(), Err(ApiError::NotAuthenticated));
        assert_eq!(session.bearer_at(999).map(|_| ()), Ok(()));
    }
}
