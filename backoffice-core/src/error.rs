//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use backoffice_api::ApiError;

/// Fallback shown when a failure carries no message meant for users.
pub const GENERIC_FAILURE_MESSAGE: &str = "요청 처리 중 오류가 발생했습니다.";

/// Shown when the server refuses the session token.
pub const SESSION_EXPIRED_MESSAGE: &str = "로그인이 만료되었습니다. 다시 로그인해주세요.";

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Client-side validation failed; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network, timeout, gateway or decoding failure.
    #[error("{0}")]
    Transport(ApiError),

    /// The server rejected the request (`success: false` or a 4xx with a message).
    #[error("{0}")]
    Application(ApiError),

    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(ApiError),

    /// Requested page outside `1..=total_pages`
    #[error("Page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: u32, total_pages: u32 },

    /// Not signed in, session expired, or not an admin
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The form is already being submitted
    #[error("A submission is already in progress")]
    AlreadySubmitting,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Application { .. } => Self::Application(err),
            ApiError::NotFound { .. } => Self::NotFound(err),
            ApiError::Unauthorized { .. } => {
                log::warn!("{err}");
                Self::Unauthorized(
                    err.server_message()
                        .unwrap_or(SESSION_EXPIRED_MESSAGE)
                        .to_string(),
                )
            }
            _ => Self::Transport(err),
        }
    }
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::Application(_)
            | Self::NotFound(_)
            | Self::PageOutOfRange { .. }
            | Self::Unauthorized(_)
            | Self::AlreadySubmitting => true,
            Self::Transport(e) => e.is_expected(),
            Self::Config(_) | Self::Storage(_) => false,
        }
    }

    /// Message the server attached to an application-level rejection.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Application(e) => e.server_message(),
            _ => None,
        }
    }

    /// Text to show to the user for this failure.
    ///
    /// Application rejections show the server's message verbatim; transport and
    /// not-found failures fall back to [`GENERIC_FAILURE_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Unauthorized(msg) | Self::Config(msg) => msg.clone(),
            Self::Storage(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            Self::Application(e) => e
                .server_message()
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string(),
            Self::Transport(_) | Self::NotFound(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            Self::PageOutOfRange { .. } | Self::AlreadySubmitting => self.to_string(),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
