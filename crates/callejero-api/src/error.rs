use thiserror::Error;

/// Top-level error type for the `callejero-api` crate.
///
/// Two failure kinds matter to callers: a response was obtained but carried
/// a non-2xx status ([`Http`](Error::Http)), or no response was obtained at
/// all ([`Transport`](Error::Transport)). `callejero-core` is the only place
/// that maps these into user-facing text.
#[derive(Debug, Error)]
pub enum Error {
    /// No response obtained (connection refused, DNS failure, etc.)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Base URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-2xx response. `detail` carries the server's structured message
    /// when the body was a `{detail: "..."}` object.
    #[error("HTTP {status}: {}", detail.as_deref().unwrap_or("(no detail)"))]
    Http { status: u16, detail: Option<String> },

    /// 2xx response whose body failed to decode, with the raw body for debugging.
    #[error("deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status code, if a response was obtained.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The server-supplied `detail` message, if present.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
