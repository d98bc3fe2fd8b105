use std::sync::Arc;

use auth::TokenIssuer;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use super::errors::PipelineError;

const CONTEXT: &str = "auth_guard";

/// Verified subject of a request, attached by [`auth_guard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub email: String,
}

/// Auth guard stage.
///
/// - no `Authorization` header: rejected with 401
/// - header present but unusable or failing verification: continues
///   without an identity
/// - verified bearer token: continues with an [`AuthenticatedIdentity`]
///
/// Handlers that require an identity take the [`Authenticated`] extractor.
pub async fn auth_guard(
    State(token_issuer): State<Arc<TokenIssuer>>,
    mut req: Request,
    next: Next,
) -> Result<Response, PipelineError> {
    let Some(header) = req.headers().get(header::AUTHORIZATION) else {
        return Err(PipelineError::authentication(CONTEXT, "Unauthorized"));
    };

    let verified = bearer_token(header).map(|token| token_issuer.verify(token));

    match verified {
        Some(Ok(claims)) => {
            req.extensions_mut().insert(AuthenticatedIdentity {
                email: claims.email,
            });
        }
        Some(Err(e)) => {
            tracing::debug!(error = %e, "Bearer token rejected, continuing unauthenticated");
        }
        None => {
            tracing::debug!("Unusable Authorization header, continuing unauthenticated");
        }
    }

    Ok(next.run(req).await)
}

/// Token part of a `Bearer <token>` header value.
fn bearer_token(header: &HeaderValue) -> Option<&str> {
    let value = header.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Extractor for handlers that require an authenticated caller.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = PipelineError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| PipelineError::authentication(CONTEXT, "Unauthorized"))
    }
}
