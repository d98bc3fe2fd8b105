use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenClaims;

/// Issues and verifies access tokens bound to one shared secret.
///
/// The secret is read-only after construction, so a single issuer can be
/// shared across concurrent requests.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    expiration_hours: Option<i64>,
}

impl TokenIssuer {
    /// Create an issuer whose tokens never expire.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            expiration_hours: None,
        }
    }

    /// Attach an expiration to every issued token.
    pub fn with_expiration_hours(mut self, hours: i64) -> Self {
        self.expiration_hours = Some(hours);
        self
    }

    /// Sign claims for `email` issued now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed; fatal for the request
    pub fn issue(&self, email: &str) -> Result<String, JwtError> {
        let claims = match self.expiration_hours {
            Some(hours) => TokenClaims::expiring(email, hours),
            None => TokenClaims::new(email),
        };

        self.jwt_handler.encode(&claims)
    }

    /// Verify a token's signature and recover its claims.
    ///
    /// # Errors
    /// * `MissingToken`, `InvalidSignature`, `TokenExpired`, `DecodingFailed`
    pub fn verify(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.jwt_handler.decode(token)
    }
}

/// Sign claims for `email` with `secret`.
pub fn issue(email: &str, secret: &[u8]) -> Result<String, JwtError> {
    TokenIssuer::new(secret).issue(email)
}

/// Verify `token` against `secret`.
pub fn verify(token: &str, secret: &[u8]) -> Result<TokenClaims, JwtError> {
    TokenIssuer::new(secret).verify(token)
}
