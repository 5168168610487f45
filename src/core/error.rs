//! Typed error handling for the biztime API
//!
//! Two error types live here:
//!
//! - [`StoreError`]: raised by storage backends. Distinguishes constraint
//!   rejections (bad foreign key, duplicate key) from everything else, so
//!   handlers can map the former to 400 and the latter to 500.
//! - [`ApiError`]: the handler-facing error that knows its HTTP status code
//!   and serializes to a JSON [`ErrorResponse`] body.
//!
//! An absent row is never an error at the storage layer — backends return
//! `Option`/`bool` and handlers decide whether that means 404.
//!
//! # Example
//!
//! ```rust,ignore
//! let company = state
//!     .store
//!     .get_company(&code)
//!     .await?
//!     .ok_or_else(|| ApiError::not_found("company", &code))?;
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store rejected the write (foreign key or unique constraint).
    #[error("store rejected the write: {message}")]
    Integrity { message: String },

    /// Any other backend failure (connectivity, bad SQL, poisoned lock).
    #[error("{backend} query error: {message}")]
    Query {
        backend: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn integrity(message: impl Into<String>) -> Self {
        StoreError::Integrity {
            message: message.into(),
        }
    }

    pub fn query(backend: &'static str, message: impl fmt::Display) -> Self {
        StoreError::Query {
            backend,
            message: message.to_string(),
        }
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// The main error type returned by HTTP handlers
///
/// Each variant knows its HTTP status code and a stable error code that
/// clients can match on programmatically.
#[derive(Debug)]
pub enum ApiError {
    /// Resource key did not match any row (404)
    NotFound { resource: &'static str, key: String },

    /// Required request fields were absent (400)
    MissingFields { fields: Vec<&'static str> },

    /// The store rejected the write, e.g. an invalid foreign key (400)
    Rejected { message: String },

    /// Backend failure; details are logged, not sent to the client (500)
    Storage { message: String },
}

impl ApiError {
    pub fn not_found(resource: &'static str, key: impl fmt::Display) -> Self {
        ApiError::NotFound {
            resource,
            key: key.to_string(),
        }
    }

    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        ApiError::MissingFields { fields }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MissingFields { .. } => StatusCode::BAD_REQUEST,
            ApiError::Rejected { .. } => StatusCode::BAD_REQUEST,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::MissingFields { .. } => "MISSING_FIELDS",
            ApiError::Rejected { .. } => "STORE_REJECTED",
            ApiError::Storage { .. } => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::NotFound { resource, key } => Some(serde_json::json!({
                "resource": resource,
                "key": key,
            })),
            ApiError::MissingFields { fields } => Some(serde_json::json!({ "fields": fields })),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound { resource, key } => {
                write!(f, "{} with key '{}' not found", resource, key)
            }
            ApiError::MissingFields { fields } => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            ApiError::Rejected { message } => {
                write!(f, "Request rejected: {}", message)
            }
            ApiError::Storage { .. } => {
                // Backend details stay in the logs
                write!(f, "Internal storage error")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Integrity { message } => ApiError::Rejected { message },
            StoreError::Query { backend, message } => ApiError::Storage {
                message: format!("{backend}: {message}"),
            },
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            if let ApiError::Storage { message } = &self {
                tracing::error!(%message, "storage failure");
            }
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Tests
// =============================================================================
