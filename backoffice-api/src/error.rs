use serde::{Deserialize, Serialize};

/// Unified error type for every call made against the admin API.
///
/// Each variant carries the `endpoint` (`"GET /notices/"`, `"POST /auth/login/"` …)
/// that produced it, plus variant-specific context. All variants are serializable
/// for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): API rate limit exceeded
/// - [`ServerError`](Self::ServerError): 502/503/504 from a gateway
///
/// The built-in HTTP client retries these with exponential backoff on reads only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The session token is missing, expired, or lacks admin rights (HTTP 401/403).
    Unauthorized {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The requested resource does not exist (HTTP 404).
    NotFound {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The server failed to handle the request (HTTP 5xx).
    ServerError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The server rejected the request with a message: a `success: false` envelope
    /// or a 4xx status other than 401/403/404/429.
    Application {
        /// Endpoint that produced the error.
        endpoint: String,
        /// HTTP status code, if the failure was signalled through the status line.
        status: Option<u16>,
        /// Server-provided message, if any.
        message: Option<String>,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// A local file (image upload) could not be read or was rejected before sending.
    FileError {
        /// Path of the offending file.
        path: String,
        /// Error details.
        detail: String,
    },
}

impl ApiError {
    /// Whether this is expected behavior (bad input, missing resource, expired session),
    /// used to pick the log level.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::NotFound { .. }
                | Self::Application { .. }
                | Self::FileError { .. }
        )
    }

    /// Whether the request may succeed if sent again unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::ServerError { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// The message the server attached to this failure, if any.
    ///
    /// Only application-level rejections carry a message meant for users; transport
    /// failures return `None` so callers fall back to a generic text.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Application { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            Self::Unauthorized { raw_message, .. } | Self::NotFound { raw_message, .. } => {
                raw_message.as_deref().filter(|m| !m.is_empty())
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { endpoint, detail } => {
                write!(f, "[{endpoint}] Network error: {detail}")
            }
            Self::Timeout { endpoint, detail } => {
                write!(f, "[{endpoint}] Request timeout: {detail}")
            }
            Self::Unauthorized {
                endpoint,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{endpoint}] Unauthorized: {msg}")
                } else {
                    write!(f, "[{endpoint}] Unauthorized")
                }
            }
            Self::NotFound {
                endpoint,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{endpoint}] Not found: {msg}")
                } else {
                    write!(f, "[{endpoint}] Not found")
                }
            }
            Self::RateLimited {
                endpoint,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{endpoint}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{endpoint}] Rate limited")
                }
            }
            Self::ServerError {
                endpoint, status, ..
            } => {
                write!(f, "[{endpoint}] Server error (HTTP {status})")
            }
            Self::Application {
                endpoint,
                status,
                message,
            } => match (status, message) {
                (Some(code), Some(msg)) => write!(f, "[{endpoint}] HTTP {code}: {msg}"),
                (Some(code), None) => write!(f, "[{endpoint}] HTTP {code}"),
                (None, Some(msg)) => write!(f, "[{endpoint}] {msg}"),
                (None, None) => write!(f, "[{endpoint}] Request rejected"),
            },
            Self::ParseError { endpoint, detail } => {
                write!(f, "[{endpoint}] Parse error: {detail}")
            }
            Self::SerializationError { endpoint, detail } => {
                write!(f, "[{endpoint}] Serialization error: {detail}")
            }
            Self::FileError { path, detail } => {
                write!(f, "[{path}] File error: {detail}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
