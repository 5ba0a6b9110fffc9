//! Error types for guest-toolhub
//!
//! This module provides error handling for the library, including:
//! - Per-input errors raised while combining credential files (read, extract)
//! - Batch-level errors (emit) and ban-check errors
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for guest-toolhub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for guest-toolhub
///
/// Per-input failures ([`ReadError`], [`ExtractError`]) never show up here:
/// the combiner absorbs them and reports them in the batch result instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "combiner.max_concurrent_reads")
        key: Option<String>,
    },

    /// Ban-status lookup failed
    #[error("ban check error: {0}")]
    BanCheck(#[from] BanCheckError),

    /// Serializing the combined artifact failed
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),

    /// A combine request carried no files at all
    #[error("no files provided: select at least one .dat file")]
    NoFiles,

    /// Every input of a batch was skipped, so there is nothing to emit
    #[error("no valid .dat file data found ({skipped} file(s) skipped)")]
    NoValidData {
        /// Number of inputs that failed to read or extract
        skipped: usize,
    },

    /// The requested action is not supported by the endpoint
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Uploaded request body could not be read
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Service is shutting down and no longer accepts work
    #[error("service is shutting down")]
    ShuttingDown,

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Artifact could not be written because the target already exists
    #[error("file collision at {path}: {reason}")]
    FileCollision {
        /// The path where the collision occurred
        path: std::path::PathBuf,
        /// The reason for the collision (e.g., "file already exists")
        reason: String,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Failure to obtain the text content of one input
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying medium could not be read
    #[error("failed to read {name}: {source}")]
    Io {
        /// Display name of the input
        name: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid UTF-8 text
    #[error("{name} is not valid UTF-8 text: {source}")]
    Encoding {
        /// Display name of the input
        name: String,
        /// The underlying decoding error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The content exceeds the configured size limit
    #[error("{name} is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge {
        /// Display name of the input
        name: String,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },
}

/// Failure to extract a record from text content
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Content is not a valid JSON document
    #[error("content is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Document lacks the required field path
    #[error("missing or non-string field `{field}`")]
    MissingFields {
        /// The first key on the required path that was absent or mistyped
        field: &'static str,
    },
}

/// Failure to serialize an aggregated batch
#[derive(Debug, Error)]
pub enum EmitError {
    /// The serializer rejected the combined records
    #[error("failed to serialize combined records: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Ban-status lookup errors
#[derive(Debug, Error)]
pub enum BanCheckError {
    /// No player ID was supplied
    #[error("player ID is required")]
    MissingPlayerId,

    /// The configured upstream endpoint is not a valid URL
    #[error("invalid ban check endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        /// The endpoint as configured
        endpoint: String,
        /// The URL parse failure
        #[source]
        source: url::ParseError,
    },

    /// Transport-level failure (connect, timeout, TLS, client construction)
    #[error("request to ban check service failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream service answered with a non-success status
    #[error("ban check service returned HTTP {status}")]
    UpstreamStatus {
        /// HTTP status code returned by the upstream service
        status: u16,
    },

    /// The upstream body was not the expected JSON document
    #[error("ban check service returned an invalid response: {0}")]
    InvalidResponse(String),

    /// The upstream body carried no ban status field
    #[error("ban check response has no `data.is_banned` field")]
    MissingStatus,
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "no_valid_data",
///     "message": "no valid .dat file data found (2 file(s) skipped)",
///     "details": {
///       "skipped": 2
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "no_files", "player_id_required")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::NoFiles => 400,
            Error::InvalidAction(_) => 400,
            Error::InvalidUpload(_) => 400,
            Error::BanCheck(BanCheckError::MissingPlayerId) => 400,

            // 409 Conflict
            Error::FileCollision { .. } => 409,

            // 422 Unprocessable Entity - every input was rejected
            Error::NoValidData { .. } => 422,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,

            // 500 - upstream failures surface as a generic fetch failure
            Error::BanCheck(_) => 500,

            Error::Emit(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::BanCheck(e) => match e {
                BanCheckError::MissingPlayerId => "player_id_required",
                BanCheckError::InvalidEndpoint { .. } => "ban_check_misconfigured",
                BanCheckError::Http(_)
                | BanCheckError::UpstreamStatus { .. }
                | BanCheckError::InvalidResponse(_)
                | BanCheckError::MissingStatus => "ban_check_failed",
            },
            Error::Emit(_) => "emit_failed",
            Error::NoFiles => "no_files",
            Error::NoValidData { .. } => "no_valid_data",
            Error::InvalidAction(_) => "invalid_action",
            Error::InvalidUpload(_) => "invalid_upload",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ShuttingDown => "shutting_down",
            Error::ApiServerError(_) => "api_server_error",
            Error::FileCollision { .. } => "file_collision",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::NoValidData { skipped } => Some(serde_json::json!({
                "skipped": skipped,
            })),
            Error::BanCheck(BanCheckError::UpstreamStatus { status }) => {
                Some(serde_json::json!({
                    "upstream_status": status,
                }))
            }
            Error::FileCollision { path, .. } => Some(serde_json::json!({
                "path": path,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
