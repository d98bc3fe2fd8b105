use std::any::Any;
use std::fmt;

use auth::JwtError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::user::errors::UserError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// The single failure object of the request pipeline.
///
/// Stages and handlers only ever return one of these; turning it into a
/// wire response is the job of the [`IntoResponse`] impl below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineError {
    status_code: StatusCode,
    message: String,
    context: &'static str,
}

impl PipelineError {
    fn new(status_code: StatusCode, context: &'static str, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            context,
        }
    }

    /// Malformed or missing input (400).
    pub fn validation(context: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, context, message)
    }

    /// Missing or invalid credentials (401).
    pub fn authentication(context: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, context, message)
    }

    /// Duplicate registration (422).
    pub fn conflict(context: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, context, message)
    }

    pub fn not_found(context: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, context, "Not found")
    }

    /// Internal fault (500). The cause is logged and never sent to the client.
    pub fn internal(context: &'static str, cause: impl fmt::Display) -> Self {
        tracing::error!(context, error = %cause, "Internal fault");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, context, INTERNAL_MESSAGE)
    }

    pub fn with_context(mut self, context: &'static str) -> Self {
        self.context = context;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &'static str {
        self.context
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.context,
            self.status_code.as_u16(),
            self.message
        )
    }
}

impl std::error::Error for PipelineError {}

impl From<UserError> for PipelineError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(_) => {
                PipelineError::conflict("user_service", "User already exists")
            }
            UserError::InvalidEmail(e) => PipelineError::validation("user_service", e.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                PipelineError::internal("user_service", err)
            }
        }
    }
}

impl From<JwtError> for PipelineError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingFailed(_) => PipelineError::internal("token_issuer", err),
            JwtError::DecodingFailed(_)
            | JwtError::TokenExpired
            | JwtError::InvalidSignature
            | JwtError::MissingToken => PipelineError::authentication("token_issuer", "Unauthorized"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Exception filter: every failed request is answered here.
impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        if self.status_code.is_client_error() {
            tracing::debug!(
                status = self.status_code.as_u16(),
                context = self.context,
                message = %self.message,
                "Request failed"
            );
        }

        (
            self.status_code,
            Json(ApiErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Translates a panic anywhere in the pipeline into the generic 500 body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    PipelineError::internal("pipeline", format!("panic: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use auth::PasswordError;

    use super::*;
    use crate::user::errors::EmailError;

    #[test]
    fn test_user_errors_map_to_taxonomy() {
        let conflict = PipelineError::from(UserError::EmailAlreadyExists("a@a.ru".to_string()));
        assert_eq!(conflict.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let invalid = PipelineError::from(UserError::InvalidEmail(EmailError::InvalidFormat(
            "missing @".to_string(),
        )));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let hashing = PipelineError::from(UserError::Password(PasswordError::HashingFailed(
            "entropy source unavailable".to_string(),
        )));
        assert_eq!(hashing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hashing.message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_internal_errors_hide_cause() {
        let error = PipelineError::from(UserError::DatabaseError(
            "password authentication failed for user postgres".to_string(),
        ));

        assert_eq!(error.message(), INTERNAL_MESSAGE);
        assert!(!error.to_string().contains("postgres"));
    }

    #[test]
    fn test_jwt_errors_map_to_taxonomy() {
        let signing = PipelineError::from(JwtError::EncodingFailed("bad key".to_string()));
        assert_eq!(signing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        for err in [
            JwtError::InvalidSignature,
            JwtError::TokenExpired,
            JwtError::MissingToken,
            JwtError::DecodingFailed("garbage".to_string()),
        ] {
            let mapped = PipelineError::from(err);
            assert_eq!(mapped.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(mapped.message(), "Unauthorized");
        }
    }

    #[test]
    fn test_with_context() {
        let error = PipelineError::validation("validation", "bad").with_context("register");
        assert_eq!(error.context(), "register");
    }

    #[test]
    fn test_into_response_status() {
        let response = PipelineError::conflict("register", "User already exists").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_handle_panic_is_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
