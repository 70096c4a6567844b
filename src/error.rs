// Error types shared by the HTTP wrapper, the API functions and the
// token store. The UI layer wraps these in `anyhow` like the rest of the
// binary does.

use thiserror::Error;

/// Business status code signalling success inside the response envelope.
pub const CODE_SUCCESS: i64 = 200;

/// Business status code the back-end uses for authentication failures.
pub const CODE_UNAUTHORIZED: i64 = 401;

/// Everything that can go wrong between a view and the GoPress API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout or an unreadable response body.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx HTTP status.
    #[error("Request failed with status code {status}")]
    Status { status: u16 },

    /// The envelope carried a code other than 200. Displays as the
    /// envelope message verbatim.
    #[error("{message}")]
    Business { code: i64, message: String },

    /// The body was not an envelope, or `data` did not match the
    /// expected shape.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The durable key/value store could not be read or written.
    #[error("Local storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ApiError {
    /// True for envelope failures carrying the 401 code.
    ///
    /// Nothing in the crate reacts to this beyond logging; callers that
    /// want to force a logout have to do it themselves.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Business { code, .. } if *code == CODE_UNAUTHORIZED)
    }

    /// True when the request never produced an envelope.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Status { .. })
    }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;
