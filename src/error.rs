use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Persistence,
    Unexpected,
    Validation,
    NotFound,
    Navigation,
    Timeout,
    Render,
    UnsupportedFormat,
    CaptureBusy,
}

impl ErrorKind {
    /// Codes below 100 are internal and never describe themselves to clients.
    pub fn code(&self) -> i32 {
        match self {
            Self::Configuration => 1,
            Self::Persistence => 2,
            Self::Unexpected => 5,
            Self::Validation => 101,
            Self::NotFound => 102,
            Self::Navigation => 201,
            Self::Timeout => 202,
            Self::Render => 203,
            Self::UnsupportedFormat => 204,
            Self::CaptureBusy => 205,
        }
    }

    pub fn is_internal(&self) -> bool {
        (1..=99).contains(&self.code())
    }

    pub fn is_capture_failure(&self) -> bool {
        matches!(
            self,
            Self::Navigation | Self::Timeout | Self::Render | Self::UnsupportedFormat
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Navigation | Self::Render | Self::UnsupportedFormat => StatusCode::BAD_GATEWAY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::CaptureBusy => StatusCode::SERVICE_UNAVAILABLE,
            Self::Configuration | Self::Persistence | Self::Unexpected => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    pub fn is_validation_error(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    pub fn is_not_found_error(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        configuration_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        tracing::error!(error = %err, "storage i/o failed");
        Error::new(ErrorKind::Persistence, "storage error")
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        unsupported_format_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let error_message = if self.kind.is_internal() {
            "Internal Server Error"
        } else {
            self.message.as_str()
        };

        let body = Json(json!({
            "code": self.code(),
            "kind": self.kind,
            "error": error_message,
        }));

        (self.kind.status(), body).into_response()
    }
}

pub fn invalid_input_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Validation, message)
}

pub fn not_found_error(resource: &str, id: i64) -> Error {
    Error::new(ErrorKind::NotFound, format!("{} {} not found", resource, id))
}

pub fn navigation_error<T: Display>(err: T) -> Error {
    tracing::warn!(error = %err, "navigation failed");
    Error::new(ErrorKind::Navigation, "could not load the map page")
}

pub fn timeout_error() -> Error {
    Error::new(ErrorKind::Timeout, "the map page took too long to load")
}

pub fn render_error<T: Display>(err: T) -> Error {
    tracing::warn!(error = %err, "render failed");
    Error::new(ErrorKind::Render, "could not produce a snapshot of the map page")
}

pub fn unsupported_format_error<T: Display>(err: T) -> Error {
    tracing::warn!(error = %err, "raster probe failed");
    Error::new(ErrorKind::UnsupportedFormat, "snapshot is not a recognized image")
}

pub fn capture_busy_error() -> Error {
    Error::new(
        ErrorKind::CaptureBusy,
        "too many captures in progress, try again later",
    )
}

pub fn configuration_error<T: Display>(err: T) -> Error {
    tracing::error!(error = %err, "configuration error");
    Error::new(ErrorKind::Configuration, "configuration error")
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!(error = ?err, "database error");
    Error::new(ErrorKind::Persistence, "database error")
}

pub fn unexpected_error<T: Display>(err: T) -> Error {
    tracing::error!(error = %err, "unexpected error");
    Error::new(ErrorKind::Unexpected, "unexpected error")
}
