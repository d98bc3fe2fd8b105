use axum::extract::State;
use serde::Deserialize;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::user::models::LoginRequest;
use crate::inbound::http::errors::PipelineError;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::RequestSchema;
use crate::inbound::http::validation::Validated;
use crate::inbound::http::validation::ValidationError;

const CONTEXT: &str = "login";

pub async fn login(
    State(state): State<AppState>,
    Validated(request): Validated<LoginBody>,
) -> Result<ApiSuccess<LoginResponseData>, PipelineError> {
    let email = request.email.as_str().to_string();

    let is_valid = state
        .user_service
        .validate_user(request)
        .await
        .map_err(|e| PipelineError::from(e).with_context(CONTEXT))?;

    if !is_valid {
        return Err(PipelineError::authentication(CONTEXT, "Invalid credentials"));
    }

    let jwt = state
        .token_issuer
        .issue(&email)
        .map_err(|e| PipelineError::from(e).with_context(CONTEXT))?;

    Ok(ApiSuccess::ok(LoginResponseData { jwt }))
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

impl RequestSchema for LoginBody {
    type Validated = LoginRequest;

    const CONTEXT: &'static str = CONTEXT;

    fn validate(self) -> Result<LoginRequest, ValidationError> {
        let mut errors = ValidationError::default();

        let email = errors.email("email", self.email);
        let password = errors.non_empty("password", self.password);

        match (email, password) {
            (Some(email), Some(password)) if errors.is_empty() => {
                Ok(LoginRequest { email, password })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub jwt: String,
}
