//! Error types for qail-taos.

use reqwest::StatusCode;
use thiserror::Error;

/// Code the server-side driver uses for capabilities the REST endpoint lacks.
pub const UNSUPPORTED_CODE: i32 = 0xffff;

/// The main error type for REST SQL operations.
#[derive(Debug, Error)]
pub enum TaosError {
    /// Transactions and prepared statements do not exist over REST.
    #[error("[0x{code:x}] restful does not support {0}", code = UNSUPPORTED_CODE)]
    Unsupported(&'static str),

    /// Positional arguments were given but interpolation is disabled.
    ///
    /// Callers should retry through a path that does not need binding.
    #[error("positional arguments need interpolate_params")]
    Skip,

    /// Arguments could not be interpolated into the SQL text.
    #[error("Parameter error: {0}")]
    Params(String),

    /// Dial, TLS, or request failure from the HTTP client.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// IO error while streaming the response body.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller cancelled the query.
    #[error("Query cancelled")]
    Cancelled,

    /// The caller's deadline elapsed before the query finished.
    #[error("Query deadline exceeded")]
    DeadlineExceeded,

    /// The connection was closed.
    #[error("Connection is closed")]
    Closed,

    /// Non-200 HTTP response.
    #[error("server response: {status} - {body}")]
    Http { status: StatusCode, body: String },

    /// Non-zero status code inside a successful HTTP response.
    #[error("[0x{code:x}] {desc}")]
    Server { code: i32, desc: String },

    /// Malformed JSON, unknown column type, row width mismatch, or bad timestamp.
    #[error("Decode error: {0}")]
    Decode(serde_json::Error),

    /// Invalid configuration or DSN.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Result shape did not match the operation.
    #[error("wrong result: {0}")]
    WrongResult(String),
}

impl TaosError {
    /// Create a protocol error from a decoded status code.
    pub fn server(code: i32, desc: impl Into<String>) -> Self {
        Self::Server {
            code,
            desc: desc.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Protocol or capability code carried by this error, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Server { code, .. } => Some(*code),
            Self::Unsupported(_) => Some(UNSUPPORTED_CODE),
            _ => None,
        }
    }

    /// True if the caller should fall back to a path without argument binding.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }
}

impl From<serde_json::Error> for TaosError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::Io(e.into())
        } else {
            Self::Decode(e)
        }
    }
}

/// Result type alias for REST SQL operations.
pub type TaosResult<T> = Result<T, TaosError>;
