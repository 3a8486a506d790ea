//! Boundary error type and its HTTP translation.
//!
//! Raw error payloads are logged here and nowhere below.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use twig_core::{DbError, RepoError, Revision};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Repo(RepoError),
    Db(DbError),
    /// Payload failed shape or field checks.
    Validation(String),
    /// Mutating route without an authenticated actor.
    Unauthorized,
    /// Blocking task panicked or was cancelled.
    Task(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    revision: Option<&'a Revision>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Repo(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Db(DbError::InvalidTenant(_)) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Db(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Repo(err) => err.error_code(),
            Self::Db(DbError::InvalidTenant(_)) => "invalid_tenant",
            Self::Db(_) => "store_failure",
            Self::Validation(_) => "validation_failed",
            Self::Unauthorized => "unauthorized",
            Self::Task(_) => "internal",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(message) => write!(f, "invalid request: {message}"),
            Self::Unauthorized => write!(f, "authentication required"),
            Self::Task(message) => write!(f, "request task failed: {message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Validation(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=request_failed module=api status=error http_status={} error_code={} error={:?}",
                status.as_u16(),
                self.error_code(),
                self
            );
        } else {
            warn!(
                "event=request_rejected module=api status=error http_status={} error_code={} error={}",
                status.as_u16(),
                self.error_code(),
                self
            );
        }

        let revision = match &self {
            Self::Repo(err) => err.current_revision(),
            _ => None,
        };
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
            revision,
        };
        (status, Json(body)).into_response()
    }
}
