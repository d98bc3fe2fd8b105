use axum::extract::State;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::errors::PipelineError;
use crate::inbound::http::middleware::Authenticated;
use crate::inbound::http::router::AppState;

const CONTEXT: &str = "info";

pub async fn info(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<ApiSuccess<UserInfoResponseData>, PipelineError> {
    state
        .user_service
        .get_user_info(&identity.email)
        .await
        .map_err(|e| PipelineError::from(e).with_context(CONTEXT))?
        .map(|user| ApiSuccess::ok(UserInfoResponseData::from(&user)))
        // The account behind a still-valid token is gone.
        .ok_or_else(|| PipelineError::authentication(CONTEXT, "Unauthorized"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfoResponseData {
    pub email: String,
    pub id: i64,
}

impl From<&User> for UserInfoResponseData {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.as_str().to_string(),
            id: user.id.0,
        }
    }
}
