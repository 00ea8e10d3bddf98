//! Application error type and its RFC 7807 problem-details rendering.
//!
//! Every failure that reaches an HTTP boundary is an [`AppError`]. Rendering
//! produces `application/problem+json` bodies carrying `type`, `title`,
//! `status`, `detail`, `instance`, plus the `correlationId` and `timestamp`
//! extensions taken from the active request context.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::api::middleware::request_context;
use crate::domain::entities::UnknownVariant;

/// Field path → list of messages, as rendered in `ValidationProblemDetails.errors`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

const GENERIC_INTERNAL_DETAIL: &str = "An unexpected error occurred.";
const VALIDATION_TITLE: &str = "One or more validation errors occurred.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },
    #[error("{message}")]
    BadRequest { message: String, details: Value },
    #[error("{message}")]
    Unauthorized { message: String, details: Value },
    #[error("{message}")]
    Forbidden { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    TooManyRequests { message: String, details: Value },
    #[error("{message}")]
    Unavailable { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    /// Single-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.clone()]);
        Self::Validation { message, errors }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::BadRequest {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn too_many_requests(message: impl Into<String>, details: Value) -> Self {
        Self::TooManyRequests {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// RFC 7807 problem details body.
///
/// `errors` is only present for validation problems; `exception` only when
/// the request context allows exposing internal error details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_uri: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl ProblemDetails {
    /// Builds a problem for `status` with the standard RFC 9110 type URI and title.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        let (type_uri, title) = problem_type(status);
        Self {
            type_uri,
            title,
            status: status.as_u16(),
            detail: detail.into(),
            instance: None,
            correlation_id: None,
            timestamp: Utc::now(),
            errors: None,
            details: None,
            exception: None,
        }
    }

    /// Fills `instance` and `correlationId` from the active request context.
    pub fn with_request_context(mut self) -> Self {
        if let Some(ctx) = request_context::current() {
            self.instance = Some(ctx.instance);
            self.correlation_id = Some(ctx.correlation_id);
        }
        self
    }
}

fn problem_type(status: StatusCode) -> (&'static str, &'static str) {
    match status {
        StatusCode::BAD_REQUEST => (
            "https://tools.ietf.org/html/rfc9110#section-15.5.1",
            "Bad Request",
        ),
        StatusCode::UNAUTHORIZED => (
            "https://tools.ietf.org/html/rfc9110#section-15.5.2",
            "Unauthorized",
        ),
        StatusCode::FORBIDDEN => (
            "https://tools.ietf.org/html/rfc9110#section-15.5.4",
            "Forbidden",
        ),
        StatusCode::NOT_FOUND => (
            "https://tools.ietf.org/html/rfc9110#section-15.5.5",
            "Not Found",
        ),
        StatusCode::CONFLICT => (
            "https://tools.ietf.org/html/rfc9110#section-15.5.10",
            "Conflict",
        ),
        StatusCode::TOO_MANY_REQUESTS => (
            "https://tools.ietf.org/html/rfc6585#section-4",
            "Too Many Requests",
        ),
        StatusCode::SERVICE_UNAVAILABLE => (
            "https://tools.ietf.org/html/rfc9110#section-15.6.4",
            "Service Unavailable",
        ),
        _ => (
            "https://tools.ietf.org/html/rfc9110#section-15.6.1",
            "An error occurred while processing your request.",
        ),
    }
}

fn non_empty(details: Value) -> Option<Value> {
    match &details {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(details),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let ctx = request_context::current();
        let expose = ctx.as_ref().is_some_and(|c| c.expose_error_details);

        let problem = match self {
            AppError::Validation { message, errors } => {
                let mut p = ProblemDetails::new(status, message);
                p.title = VALIDATION_TITLE;
                p.errors = Some(errors);
                p
            }
            AppError::Internal { message, details } => {
                tracing::error!(error = %message, details = %details, "Unhandled error");
                let mut p = ProblemDetails::new(
                    status,
                    if expose {
                        message.clone()
                    } else {
                        GENERIC_INTERNAL_DETAIL.to_string()
                    },
                );
                if expose {
                    p.exception = Some(message);
                    p.details = non_empty(details);
                }
                p
            }
            AppError::BadRequest { message, details }
            | AppError::Unauthorized { message, details }
            | AppError::Forbidden { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details }
            | AppError::TooManyRequests { message, details }
            | AppError::Unavailable { message, details } => {
                let mut p = ProblemDetails::new(status, message);
                p.details = non_empty(details);
                p
            }
        }
        .with_request_context();

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::RowNotFound) {
            return AppError::not_found("Resource not found", json!({}));
        }

        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
            if db.is_foreign_key_violation() {
                return AppError::conflict(
                    "Entity is referenced by other records",
                    json!({ "constraint": db.constraint() }),
                );
            }
            if db.is_check_violation() {
                return AppError::conflict(
                    "Check constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
        }

        AppError::internal(format!("Database error: {e}"), json!({}))
    }
}

impl From<UnknownVariant> for AppError {
    fn from(e: UnknownVariant) -> Self {
        AppError::internal(format!("Invalid stored value: {e}"), json!({}))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        flatten_validation_errors(&e, None, &mut errors);
        AppError::Validation {
            message: "Request validation failed".to_string(),
            errors,
        }
    }
}

fn flatten_validation_errors(e: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in e.errors() {
        let path = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(path).or_default();
                for err in list {
                    messages.push(
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({})", err.code)),
                    );
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                flatten_validation_errors(inner, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    flatten_validation_errors(inner, Some(&format!("{path}[{idx}]")), out);
                }
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("query", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation("path", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 1))]
        quantity: i64,
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::validation("f", "bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::forbidden("no", json!({})).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::conflict("dup", json!({})).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::unavailable("full", json!({})).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_errors_are_flattened_per_field() {
        let sample = Sample {
            name: String::new(),
            quantity: 0,
        };
        let err: AppError = sample.validate().unwrap_err().into();

        match err {
            AppError::Validation { errors, .. } => {
                assert_eq!(errors["name"], vec!["Name is required".to_string()]);
                assert_eq!(errors["quantity"], vec!["Invalid value (range)".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_problem_details_serialization() {
        let mut problem = ProblemDetails::new(StatusCode::NOT_FOUND, "Event not found");
        problem.instance = Some("/api/events/1".to_string());
        problem.correlation_id = Some("abc".to_string());

        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(value["type"], "https://tools.ietf.org/html/rfc9110#section-15.5.5");
        assert_eq!(value["title"], "Not Found");
        assert_eq!(value["status"], 404);
        assert_eq!(value["detail"], "Event not found");
        assert_eq!(value["instance"], "/api/events/1");
        assert_eq!(value["correlationId"], "abc");
        assert!(value.get("timestamp").is_some());
        assert!(value.get("errors").is_none());
        assert!(value.get("exception").is_none());
    }

    fn context(expose_error_details: bool) -> request_context::RequestContext {
        request_context::RequestContext {
            correlation_id: "corr-500".to_string(),
            instance: "/api/events".to_string(),
            expose_error_details,
        }
    }

    async fn render(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_internal_error_hides_details_outside_request_context() {
        let response = AppError::internal("boom: secret", json!({"query": "x"})).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );

        let body = render(response).await;
        assert_eq!(body["detail"], GENERIC_INTERNAL_DETAIL);
        assert!(body.get("exception").is_none());
        assert!(body.get("instance").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hidden_in_production() {
        let response = request_context::scope(context(false), async {
            AppError::internal("boom: secret", json!({"query": "x"})).into_response()
        })
        .await;

        let body = render(response).await;
        assert_eq!(body["status"], 500);
        assert_eq!(body["detail"], GENERIC_INTERNAL_DETAIL);
        assert!(body.get("exception").is_none());
        assert!(body.get("details").is_none());
        assert_eq!(body["instance"], "/api/events");
        assert_eq!(body["correlationId"], "corr-500");
    }

    #[tokio::test]
    async fn test_internal_error_exposed_in_development() {
        let response = request_context::scope(context(true), async {
            AppError::internal("boom: secret", json!({"query": "x"})).into_response()
        })
        .await;

        let body = render(response).await;
        assert_eq!(body["detail"], "boom: secret");
        assert_eq!(body["exception"], "boom: secret");
        assert_eq!(body["details"]["query"], "x");
        assert_eq!(body["instance"], "/api/events");
        assert_eq!(body["correlationId"], "corr-500");
    }

    #[tokio::test]
    async fn test_client_errors_never_carry_exception() {
        let response = request_context::scope(context(true), async {
            AppError::conflict("Duplicate SKU", json!({})).into_response()
        })
        .await;

        let body = render(response).await;
        assert_eq!(body["detail"], "Duplicate SKU");
        assert!(body.get("exception").is_none());
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = AppError::unauthorized("Unauthorized", json!({})).into_response();
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }
}
