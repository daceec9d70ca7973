use thiserror::Error;

/// Error type for the `mosaic-api` crate.
///
/// Every failure a request can hit ends up here: non-200 responses,
/// timeouts, connection problems, and bodies that don't decode.
/// `mosaic-core` maps these into its own diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP ────────────────────────────────────────────────────────
    /// The service answered with anything other than `200 OK`.
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Request exceeded the transport timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection refused, DNS failure, reset mid-body, etc.
    #[error("Connection error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup failed (unreadable CA file, bad PEM, builder failure).
    #[error("TLS error: {0}")]
    Tls(String),

    /// API key contains bytes that can't go into an HTTP header.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status code, if the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the request was abandoned because it ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the service could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Returns `true` for a 404 from the service.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
