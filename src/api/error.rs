use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::store::StoreError;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";
pub const VALIDATION_FAILED: &str = "Validation failed";
const AN_ERROR_OCCURRED: &str = "An error occurred";

/// Body of every 4xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "message": "Validation failed",
    "errors": { "name": ["A department with this name already exists."] }
}))]
pub struct ErrorEnvelope {
    pub message: String,
    /// Field name (or `non_field_errors`) to the messages raised against it
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: &str, message: impl Into<String>) -> Self {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
        self
    }
}

/// Field errors gathered while validating one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Records the error side of a single-field check, passing the value through.
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "validation failed")]
    Validation(FieldErrors),
    #[display(fmt = "conflict: {}", "_0.message")]
    Conflict(ErrorEnvelope),
    #[display(fmt = "not found: {}", _0)]
    NotFound(&'static str),
    #[display(fmt = "malformed request body: {}", _0)]
    MalformedBody(String),
    #[display(fmt = "{}", _0)]
    Store(StoreError),
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl ApiError {
    pub fn not_found() -> Self {
        ApiError::NotFound("Not found.")
    }

    pub fn invalid_page() -> Self {
        ApiError::NotFound("Invalid page.")
    }

    fn envelope(&self) -> Option<ErrorEnvelope> {
        match self {
            ApiError::Validation(errors) => Some(ErrorEnvelope {
                message: VALIDATION_FAILED.to_string(),
                errors: errors.0.clone(),
            }),
            ApiError::Conflict(envelope) => Some(envelope.clone()),
            ApiError::NotFound(detail) => {
                Some(ErrorEnvelope::new(AN_ERROR_OCCURRED).with("detail", *detail))
            }
            ApiError::MalformedBody(detail) => {
                Some(ErrorEnvelope::new(VALIDATION_FAILED).with("detail", detail.clone()))
            }
            ApiError::Store(_) => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self.envelope() {
            Some(envelope) => HttpResponse::build(self.status_code()).json(envelope),
            None => {
                error!(error = %self, "Store failure");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

/// Routes JSON body errors into the envelope instead of actix's plain text.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError::MalformedBody(err.to_string()).into()
}

/// An id in the path that does not parse can never match a row.
pub fn path_error_handler(
    _err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError::not_found().into()
}
