use axum::extract::State;
use serde::Deserialize;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::user::models::RegistrationRequest;
use crate::domain::user::models::User;
use crate::inbound::http::errors::PipelineError;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::RequestSchema;
use crate::inbound::http::validation::Validated;
use crate::inbound::http::validation::ValidationError;

const CONTEXT: &str = "register";

pub async fn register(
    State(state): State<AppState>,
    Validated(request): Validated<RegistrationBody>,
) -> Result<ApiSuccess<RegisterResponseData>, PipelineError> {
    let user = state
        .user_service
        .create_user(request)
        .await
        .map_err(|e| PipelineError::from(e).with_context(CONTEXT))?
        .ok_or_else(|| PipelineError::conflict(CONTEXT, "User already exists"))?;

    Ok(ApiSuccess::ok(RegisterResponseData::from(&user)))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationBody {
    email: Option<String>,
    name: Option<String>,
    password: Option<String>,
}

impl RequestSchema for RegistrationBody {
    type Validated = RegistrationRequest;

    const CONTEXT: &'static str = CONTEXT;

    fn validate(self) -> Result<RegistrationRequest, ValidationError> {
        let mut errors = ValidationError::default();

        let email = errors.email("email", self.email);
        let name = errors.required("name", self.name);
        let password = errors.non_empty("password", self.password);

        match (email, name, password) {
            (Some(email), Some(name), Some(password)) if errors.is_empty() => {
                Ok(RegistrationRequest {
                    email,
                    name,
                    password,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub email: String,
    pub id: i64,
}

impl From<&User> for RegisterResponseData {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.as_str().to_string(),
            id: user.id.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(email: Option<&str>, name: Option<&str>, password: Option<&str>) -> RegistrationBody {
        RegistrationBody {
            email: email.map(str::to_string),
            name: name.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_body() {
        let request = body(Some("a@a.ru"), Some("Test"), Some("1"))
            .validate()
            .unwrap();

        assert_eq!(request.email.as_str(), "a@a.ru");
        assert_eq!(request.name, "Test");
        assert_eq!(request.password, "1");
    }

    #[test]
    fn test_reports_every_failing_field() {
        let err = body(Some("a.ru"), None, Some("")).validate().unwrap_err();

        let fields: Vec<_> = err.fields().iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["email", "name", "password"]);
    }

    #[test]
    fn test_input_is_not_trimmed() {
        let request = body(Some("a@a.ru"), Some("  Test "), Some(" 1 "))
            .validate()
            .unwrap();

        assert_eq!(request.name, "  Test ");
        assert_eq!(request.password, " 1 ");
    }
}
