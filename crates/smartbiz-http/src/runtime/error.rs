//! Unified error handling for the HTTP runtime
//!
//! Every failure leaves the runtime as an [`ApiError`], which maps to a status
//! code and a JSON body of the form
//! `{success: false, error, message, errors?, request_id}`.
//! Internal details are logged with the request id and never returned.

use axum::{
    extract::{FromRequestParts, Request},
    http::{
        Extensions, StatusCode,
        header::{self, HeaderValue},
        request::Parts,
    },
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use smartbiz_core::{RepositoryError, ValidationError, validation::FieldError};
use std::convert::Infallible;
use std::fmt;

use crate::runtime::rate_limit::{LimitScope, RateLimitError};

/// Maximum length for client-provided request IDs
const MAX_REQUEST_ID_LENGTH: usize = 128;

/// Correlation id of one request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Accept a client-provided id if it is safe to log and echo
    pub fn parse(value: &str) -> Option<Self> {
        validate_request_id(value).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request extension carrying the id assigned by [`request_id_middleware`]
#[derive(Debug, Clone)]
pub struct RequestIdExtension(pub RequestId);

/// Alphanumerics, `-` and `_` only, at most 128 characters.
///
/// Colons and control characters are rejected so ids cannot forge
/// structured log fields.
fn validate_request_id(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_REQUEST_ID_LENGTH
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Request id stored in `extensions`, or a fresh one
pub fn request_id_from_extensions(extensions: &Extensions) -> RequestId {
    extensions
        .get::<RequestIdExtension>()
        .map(|ext| ext.0.clone())
        .unwrap_or_else(RequestId::generate)
}

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(request_id_from_extensions(&parts.extensions))
    }
}

/// Middleware that assigns every request an id
///
/// Reuses a valid `X-Request-ID` header or generates a UUID, stores it in the
/// request extensions and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .and_then(RequestId::parse)
        .unwrap_or_else(RequestId::generate);

    request
        .extensions_mut()
        .insert(RequestIdExtension(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(
            header::HeaderName::from_static("x-request-id"),
            header_value,
        );
    }

    response
}

/// Machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationFailed,
    InvalidJson,
    AuthenticationRequired,
    InvalidCredentials,
    RegistrationDisabled,
    Forbidden,
    NotFound,
    PayloadTooLarge,
    RateLimitExceeded,
    RequestTimeout,
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::InvalidJson => "invalid_json",
            Self::AuthenticationRequired => "authentication_required",
            Self::InvalidCredentials => "invalid_credentials",
            Self::RegistrationDisabled => "registration_disabled",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::PayloadTooLarge => "payload_too_large",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::RequestTimeout => "request_timeout",
            Self::StorageError => "storage_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldErrorBody>>,
    pub request_id: RequestId,
}

/// Serialized validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorBody {
    pub field: String,
    pub message: String,
}

impl From<FieldError> for FieldErrorBody {
    fn from(err: FieldError) -> Self {
        Self {
            field: err.field,
            message: err.message,
        }
    }
}

/// Error categories
#[derive(Debug, Clone)]
pub enum ApiErrorKind {
    /// One or more request fields failed validation
    Validation { errors: Vec<ValidationError> },

    /// Body was not valid JSON for the endpoint
    InvalidJson { reason: String },

    /// Missing or unknown bearer token
    AuthenticationRequired,

    /// Login did not match. `hint` names the accepted demo credentials.
    InvalidCredentials { hint: Option<String> },

    /// Registration endpoint called
    RegistrationDisabled { hint: Option<String> },

    /// Resource belongs to another user
    Forbidden { resource: String },

    NotFound { resource: String },

    PayloadTooLarge,

    RateLimitExceeded {
        scope: LimitScope,
        message: String,
        retry_after: u64,
    },

    /// Request outlived the configured request timeout
    RequestTimeout { timeout_secs: u64 },

    Storage { reason: String },
}

/// HTTP runtime error
#[derive(Debug)]
pub struct ApiError {
    pub request_id: RequestId,
    pub kind: ApiErrorKind,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, request_id: RequestId) -> Self {
        Self { request_id, kind }
    }

    pub fn validation(errors: Vec<ValidationError>, request_id: RequestId) -> Self {
        Self::new(ApiErrorKind::Validation { errors }, request_id)
    }

    pub fn invalid_json(reason: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(
            ApiErrorKind::InvalidJson {
                reason: reason.into(),
            },
            request_id,
        )
    }

    pub fn authentication_required(request_id: RequestId) -> Self {
        Self::new(ApiErrorKind::AuthenticationRequired, request_id)
    }

    pub fn invalid_credentials(hint: Option<String>, request_id: RequestId) -> Self {
        Self::new(ApiErrorKind::InvalidCredentials { hint }, request_id)
    }

    pub fn registration_disabled(hint: Option<String>, request_id: RequestId) -> Self {
        Self::new(ApiErrorKind::RegistrationDisabled { hint }, request_id)
    }

    pub fn forbidden(resource: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(
            ApiErrorKind::Forbidden {
                resource: resource.into(),
            },
            request_id,
        )
    }

    pub fn not_found(resource: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(
            ApiErrorKind::NotFound {
                resource: resource.into(),
            },
            request_id,
        )
    }

    pub fn payload_too_large(request_id: RequestId) -> Self {
        Self::new(ApiErrorKind::PayloadTooLarge, request_id)
    }

    pub fn rate_limit_exceeded(
        scope: LimitScope,
        err: RateLimitError,
        request_id: RequestId,
    ) -> Self {
        Self::new(
            ApiErrorKind::RateLimitExceeded {
                scope,
                message: err.message,
                retry_after: err.retry_after,
            },
            request_id,
        )
    }

    pub fn storage(err: RepositoryError, request_id: RequestId) -> Self {
        Self::new(
            ApiErrorKind::Storage {
                reason: err.to_string(),
            },
            request_id,
        )
    }

    pub fn request_timeout(timeout_secs: u64, request_id: RequestId) -> Self {
        Self::new(ApiErrorKind::RequestTimeout { timeout_secs }, request_id)
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    pub fn status_code(&self) -> StatusCode {
        match &self.kind {
            ApiErrorKind::Validation { .. } | ApiErrorKind::InvalidJson { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiErrorKind::AuthenticationRequired | ApiErrorKind::InvalidCredentials { .. } => {
                StatusCode::UNAUTHORIZED
            }
            ApiErrorKind::RegistrationDisabled { .. } | ApiErrorKind::Forbidden { .. } => {
                StatusCode::FORBIDDEN
            }
            ApiErrorKind::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiErrorKind::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiErrorKind::RequestTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
            ApiErrorKind::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match &self.kind {
            ApiErrorKind::Validation { .. } => ErrorCode::ValidationFailed,
            ApiErrorKind::InvalidJson { .. } => ErrorCode::InvalidJson,
            ApiErrorKind::AuthenticationRequired => ErrorCode::AuthenticationRequired,
            ApiErrorKind::InvalidCredentials { .. } => ErrorCode::InvalidCredentials,
            ApiErrorKind::RegistrationDisabled { .. } => ErrorCode::RegistrationDisabled,
            ApiErrorKind::Forbidden { .. } => ErrorCode::Forbidden,
            ApiErrorKind::NotFound { .. } => ErrorCode::NotFound,
            ApiErrorKind::PayloadTooLarge => ErrorCode::PayloadTooLarge,
            ApiErrorKind::RateLimitExceeded { .. } => ErrorCode::RateLimitExceeded,
            ApiErrorKind::RequestTimeout { .. } => ErrorCode::RequestTimeout,
            ApiErrorKind::Storage { .. } => ErrorCode::StorageError,
        }
    }

    /// Message safe to show to clients
    fn user_facing_message(&self) -> String {
        match &self.kind {
            ApiErrorKind::Validation { errors } => errors
                .first()
                .map(ToString::to_string)
                .unwrap_or_else(|| "Invalid request".to_string()),
            ApiErrorKind::InvalidJson { .. } => "Invalid JSON in request body.".to_string(),
            ApiErrorKind::AuthenticationRequired => {
                "Not authorized to access this route".to_string()
            }
            ApiErrorKind::InvalidCredentials { hint: Some(hint) } => {
                format!("Invalid credentials. Use {hint}")
            }
            ApiErrorKind::InvalidCredentials { hint: None } => "Invalid credentials".to_string(),
            ApiErrorKind::RegistrationDisabled { hint: Some(hint) } => {
                format!("Registration is disabled for demo purposes. Please use {hint}")
            }
            ApiErrorKind::RegistrationDisabled { hint: None } => {
                "Registration is disabled".to_string()
            }
            ApiErrorKind::Forbidden { resource } => {
                format!("Not authorized to access this {resource}")
            }
            ApiErrorKind::NotFound { resource } => {
                let mut chars = resource.chars();
                match chars.next() {
                    Some(first) => format!("{}{} not found", first.to_uppercase(), chars.as_str()),
                    None => "Not found".to_string(),
                }
            }
            ApiErrorKind::PayloadTooLarge => "Request body is too large.".to_string(),
            ApiErrorKind::RateLimitExceeded { message, .. } => message.clone(),
            ApiErrorKind::RequestTimeout { .. } => {
                "Request timed out. Please try again later.".to_string()
            }
            ApiErrorKind::Storage { .. } => {
                "A storage error occurred. Please try again later.".to_string()
            }
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let errors = match &self.kind {
            ApiErrorKind::Validation { errors } => Some(
                errors
                    .iter()
                    .map(|e| FieldErrorBody::from(e.to_field_error()))
                    .collect(),
            ),
            _ => None,
        };

        ErrorResponse {
            success: false,
            error: self.error_code().as_str().to_string(),
            message: self.user_facing_message(),
            errors,
            request_id: self.request_id.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ApiErrorKind::Validation { errors } => {
                write!(f, "Validation failed: {} error(s)", errors.len())
            }
            ApiErrorKind::InvalidJson { reason } => write!(f, "Invalid JSON: {}", reason),
            ApiErrorKind::AuthenticationRequired => write!(f, "Authentication required"),
            ApiErrorKind::InvalidCredentials { .. } => write!(f, "Invalid credentials"),
            ApiErrorKind::RegistrationDisabled { .. } => write!(f, "Registration disabled"),
            ApiErrorKind::Forbidden { resource } => write!(f, "Forbidden: {}", resource),
            ApiErrorKind::NotFound { resource } => write!(f, "Not found: {}", resource),
            ApiErrorKind::PayloadTooLarge => write!(f, "Payload too large"),
            ApiErrorKind::RateLimitExceeded { scope, .. } => {
                write!(f, "Rate limit exceeded: {}", scope.as_str())
            }
            ApiErrorKind::RequestTimeout { timeout_secs } => {
                write!(f, "Request timed out after {}s", timeout_secs)
            }
            ApiErrorKind::Storage { reason } => write!(f, "Storage error: {}", reason),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = self.to_error_response();

        if status_code.is_server_error() {
            tracing::error!(
                error_code = %self.error_code(),
                request_id = %self.request_id(),
                status_code = %status_code,
                error_message = %self,
                "HTTP runtime error occurred"
            );
        } else {
            tracing::debug!(
                error_code = %self.error_code(),
                request_id = %self.request_id(),
                status_code = %status_code,
                error_message = %self,
                "Request rejected"
            );
        }

        let mut response = (status_code, Json(error_response)).into_response();

        if let ApiErrorKind::RateLimitExceeded { retry_after, .. } = &self.kind {
            if let Ok(header_value) = retry_after.to_string().parse() {
                response.headers_mut().insert(header::RETRY_AFTER, header_value);
            } else {
                tracing::warn!(retry_after, "Failed to parse Retry-After header value");
            }
        }

        response
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn rid() -> RequestId {
        RequestId::parse("test-request-1").unwrap()
    }

    #[test]
    fn test_request_id_validation() {
        assert!(RequestId::parse("abc-123_DEF").is_some());
        assert!(RequestId::parse("").is_none());
        assert!(RequestId::parse("has:colon").is_none());
        assert!(RequestId::parse("line\nbreak").is_none());
        assert!(RequestId::parse(&"a".repeat(129)).is_none());
        assert!(RequestId::parse(&"a".repeat(128)).is_some());
    }

    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (ApiError::validation(vec![ValidationError::ContentTooShort], rid()), 400),
            (ApiError::invalid_json("eof", rid()), 400),
            (ApiError::authentication_required(rid()), 401),
            (ApiError::invalid_credentials(None, rid()), 401),
            (ApiError::registration_disabled(None, rid()), 403),
            (ApiError::forbidden("feedback", rid()), 403),
            (ApiError::not_found("feedback", rid()), 404),
            (ApiError::payload_too_large(rid()), 413),
            (ApiError::request_timeout(60, rid()), 408),
            (
                ApiError::storage(RepositoryError::Duplicate { id: "f-1".to_string() }, rid()),
                500,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{}", err);
        }
    }

    #[test]
    fn test_validation_response_lists_fields() {
        let err = ApiError::validation(
            vec![ValidationError::InvalidEmail, ValidationError::PasswordRequired],
            rid(),
        );
        let body = err.to_error_response();
        assert!(!body.success);
        assert_eq!(body.error, "validation_failed");
        assert_eq!(body.message, "Please provide a valid email");
        let errors = body.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].field, "password");
        assert_eq!(errors[1].message, "Password is required");
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            ApiError::authentication_required(rid()).to_error_response().message,
            "Not authorized to access this route"
        );
        assert_eq!(
            ApiError::not_found("feedback", rid()).to_error_response().message,
            "Feedback not found"
        );
        assert_eq!(
            ApiError::forbidden("feedback", rid()).to_error_response().message,
            "Not authorized to access this feedback"
        );
        assert_eq!(
            ApiError::invalid_credentials(Some("a@b.c / pw".to_string()), rid())
                .to_error_response()
                .message,
            "Invalid credentials. Use a@b.c / pw"
        );
    }

    #[test]
    fn test_storage_details_not_exposed() {
        let err = ApiError::storage(
            RepositoryError::Duplicate {
                id: "secret-feedback-id".to_string(),
            },
            rid(),
        );
        assert!(err.to_string().contains("secret-feedback-id"));
        let body = err.to_error_response();
        assert!(!body.message.contains("secret-feedback-id"));
        assert_eq!(body.error, "storage_error");
    }

    #[test]
    fn test_request_timeout_response() {
        let response = ApiError::request_timeout(60, rid()).into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let body = ApiError::request_timeout(60, rid()).to_error_response();
        assert_eq!(body.error, "request_timeout");
        assert_eq!(body.message, "Request timed out. Please try again later.");
    }

    #[test]
    fn test_rate_limit_response_has_retry_after() {
        let err = ApiError::rate_limit_exceeded(
            LimitScope::Auth,
            RateLimitError {
                error: "auth_rate_limit_exceeded".to_string(),
                message: "slow down".to_string(),
                retry_after: 7,
            },
            rid(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "7");
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::RateLimitExceeded).unwrap();
        assert_eq!(json, "\"rate_limit_exceeded\"");
        assert_eq!(ErrorCode::NotFound.to_string(), "not_found");
    }
}
