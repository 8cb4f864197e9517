//! Application error taxonomy.
//!
//! Every failure surfaced by this crate is an [`AppError`] carrying exactly
//! one [`ErrorCode`]. Adapters sitting behind or in front of the use case
//! turn whatever they caught into an `AppError` with [`to_app_error`].

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message used when a failure has no error shape we can read a message from.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Closed set of application error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    RateLimited,
    UpstreamUnavailable,
    Internal,
}

impl ErrorCode {
    pub const ALL: [Self; 8] = [
        Self::ValidationError,
        Self::Unauthorized,
        Self::Forbidden,
        Self::NotFound,
        Self::Conflict,
        Self::RateLimited,
        Self::UpstreamUnavailable,
        Self::Internal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::RateLimited => "RATE_LIMITED",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized application error.
///
/// Fields are read-only once built; `details` can only be attached while
/// constructing through [`AppError::with_details`].
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach diagnostic details. Details never drive control flow.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RateLimited, message)
    }

    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        to_app_error(Failure::Error(err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Anything a caller caught and wants turned into an [`AppError`].
pub enum Failure {
    /// Already normalized.
    App(AppError),
    /// An error value with a readable message.
    Error(anyhow::Error),
    /// A value of unknown shape, e.g. a panic payload.
    Opaque(Box<dyn Any + Send>),
}

impl Failure {
    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Error(anyhow::Error::new(err))
    }

    pub fn opaque<T: Any + Send>(value: T) -> Self {
        Self::Opaque(Box::new(value))
    }

    /// Wrap a payload from `std::panic::catch_unwind` or `JoinError::into_panic`.
    #[must_use]
    pub fn panic(payload: Box<dyn Any + Send>) -> Self {
        Self::Opaque(payload)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App(err) => f.debug_tuple("App").field(err).finish(),
            Self::Error(err) => f.debug_tuple("Error").field(err).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<AppError> for Failure {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Self::Error(err)
    }
}

/// Normalize any failure into an [`AppError`]. Never panics.
///
/// An `AppError` anywhere we can see it is returned as is, so the function
/// is idempotent. Error values become `INTERNAL` with their message.
/// Opaque values become `INTERNAL` with [`UNKNOWN_ERROR_MESSAGE`]; their
/// content is never copied into the message.
pub fn to_app_error(failure: impl Into<Failure>) -> AppError {
    match failure.into() {
        Failure::App(err) => err,
        Failure::Error(err) => from_anyhow(&err),
        Failure::Opaque(value) => from_opaque(value),
    }
}

fn from_anyhow(err: &anyhow::Error) -> AppError {
    if let Some(app) = err.downcast_ref::<AppError>() {
        return app.clone();
    }
    AppError::internal(err.to_string())
}

fn from_opaque(value: Box<dyn Any + Send>) -> AppError {
    let value = match value.downcast::<AppError>() {
        Ok(app) => return *app,
        Err(value) => value,
    };
    let value = match value.downcast::<anyhow::Error>() {
        Ok(err) => return from_anyhow(&err),
        Err(value) => value,
    };
    match value.downcast::<Box<dyn std::error::Error + Send + Sync>>() {
        Ok(err) => AppError::internal(err.to_string()),
        Err(_) => AppError::internal(UNKNOWN_ERROR_MESSAGE),
    }
}
