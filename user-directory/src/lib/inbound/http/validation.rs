use std::fmt;

use axum::async_trait;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::Json;
use serde::de::DeserializeOwned;

use super::errors::PipelineError;
use crate::domain::user::models::EmailAddress;

/// Raw request body whose shape is checked before any business logic runs.
///
/// Implementors declare every field as `Option` so that a missing field
/// becomes a field-level message instead of a deserializer error.
pub trait RequestSchema: DeserializeOwned + Send {
    /// Typed request produced by a successful check.
    type Validated: Send;

    /// Route name reported when validation fails.
    const CONTEXT: &'static str;

    fn validate(self) -> Result<Self::Validated, ValidationError>;
}

/// Validation stage: extracts `B` from a JSON body and validates it.
///
/// A handler taking this extractor is never invoked for an invalid body.
pub struct Validated<B: RequestSchema>(pub B::Validated);

#[async_trait]
impl<S, B> FromRequest<S> for Validated<B>
where
    S: Send + Sync,
    B: RequestSchema,
{
    type Rejection = PipelineError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<B>::from_request(req, state)
            .await
            .map_err(|rejection| PipelineError::validation(B::CONTEXT, rejection.body_text()))?;

        body.validate()
            .map(Validated)
            .map_err(|e| PipelineError::validation(B::CONTEXT, e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// Every field that failed validation, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    /// Require a present value.
    pub fn required(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        if value.is_none() {
            self.push(field, "is required");
        }
        value
    }

    /// Require a present, non-empty value.
    pub fn non_empty(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        match self.required(field, value) {
            Some(value) if value.is_empty() => {
                self.push(field, "must not be empty");
                None
            }
            value => value,
        }
    }

    /// Require a well-formed email address.
    pub fn email(&mut self, field: &'static str, value: Option<String>) -> Option<EmailAddress> {
        let value = self.required(field, value)?;
        match EmailAddress::new(value) {
            Ok(email) => Some(email),
            Err(_) => {
                self.push(field, "must be a valid email address");
                None
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .fields
            .iter()
            .map(|error| format!("{}: {}", error.field, error.reason))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}
