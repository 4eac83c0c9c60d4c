//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarError;
use crate::holidays::HolidayError;
use crate::ip::IpLookupError;
use crate::tools::age::AgeError;
use crate::weather::WeatherError;

// Envelope

/// Successful response body, `{"success": true, "data": ...}`
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Wraps handler output in the success envelope.
pub struct ApiJson<T>(pub T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        Json(ApiResponse {
            success: true,
            data: self.0,
        })
        .into_response()
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Failed response body, `{"success": false, "error": {...}}`
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

// Errors

/// Who is responsible for a failure, which decides how it's reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Client,
    Upstream,
    Internal,
}

/// Implemented by domain errors so handlers can hand them to
/// [`ApiError::at`].
pub trait Classify {
    fn fault(&self) -> Fault;
}

impl Classify for HolidayError {
    fn fault(&self) -> Fault {
        if self.is_upstream() {
            Fault::Upstream
        } else {
            Fault::Internal
        }
    }
}

impl Classify for CalendarError {
    fn fault(&self) -> Fault {
        match self {
            CalendarError::OutOfRange(_) | CalendarError::InvalidDate { .. } => Fault::Client,
            CalendarError::Conversion => Fault::Internal,
            CalendarError::Holidays(e) => e.fault(),
        }
    }
}

impl Classify for IpLookupError {
    fn fault(&self) -> Fault {
        if self.is_upstream() {
            Fault::Upstream
        } else {
            Fault::Internal
        }
    }
}

impl Classify for WeatherError {
    fn fault(&self) -> Fault {
        Fault::Upstream
    }
}

impl Classify for AgeError {
    fn fault(&self) -> Fault {
        Fault::Client
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Upstream {
        endpoint: &'static str,
        source: anyhow::Error,
    },
    Internal {
        endpoint: &'static str,
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Convert a domain error raised while serving `endpoint`.
    pub fn at<E>(endpoint: &'static str, err: E) -> Self
    where
        E: Classify + std::error::Error + Send + Sync + 'static,
    {
        match err.fault() {
            Fault::Client => ApiError::BadRequest(err.to_string()),
            Fault::Upstream => ApiError::Upstream {
                endpoint,
                source: err.into(),
            },
            Fault::Internal => ApiError::Internal {
                endpoint,
                source: err.into(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Upstream { .. } => "UPSTREAM_ERROR",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Convert `ApiError` into the failure envelope. Upstream and internal
/// errors are logged with their endpoint and reported to the client
/// with a generic message.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let message = match self {
            ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m) => m,
            ApiError::Upstream { endpoint, source } => {
                tracing::error!("[{}] upstream error: {:#}", endpoint, source);
                "Upstream service request failed".to_string()
            }
            ApiError::Internal { endpoint, source } => {
                tracing::error!("[{}] internal error: {:#}", endpoint, source);
                "Something went wrong".to_string()
            }
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: ErrorDetail { code, message },
            }),
        )
            .into_response()
    }
}

// Re-export public types from each route

pub mod calendar {
    pub use crate::api::routes::calendar::public::*;
}

pub mod health {
    pub use crate::api::routes::health::public::*;
}

pub mod ip {
    pub use crate::api::routes::ip::public::*;
}

pub mod tools {
    pub use crate::api::routes::tools::public::*;
}

pub mod weather {
    pub use crate::api::routes::weather::public::*;
}
