use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Signed payload of an access token.
///
/// Only trusted after signature verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject email
    pub email: String,

    /// Issued at (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Claims for `email` issued now, without expiration.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            issued_at: Utc::now().timestamp(),
            exp: None,
        }
    }

    /// Claims for `email` issued now that expire after `hours`.
    pub fn expiring(email: impl Into<String>, hours: i64) -> Self {
        let claims = Self::new(email);
        let exp = claims.issued_at + Duration::hours(hours).num_seconds();
        claims.with_expiration(exp)
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.issued_at = iat;
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }
}
