// ── Core error types ──
//
// Errors surfaced by the coordinator. `From<mosaic_api::Error>` folds
// transport failures into the variants callers actually branch on.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Refresh ──────────────────────────────────────────────────────
    /// The display list could not be fetched; the previous snapshot stands.
    #[error("Error communicating with Mosaic: {message}")]
    UpdateFailed { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to Mosaic at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Mosaic request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── API errors ───────────────────────────────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if the service answered at all).
        status: Option<u16>,
    },

    // ── Input / lifecycle ────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Coordinator not ready: {message}")]
    NotReady { message: String },
}

impl CoreError {
    /// HTTP status code carried by an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mosaic_api::Error> for CoreError {
    fn from(err: mosaic_api::Error) -> Self {
        match err {
            mosaic_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            mosaic_api::Error::Transport(ref e) if e.is_connect() => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: err.to_string(),
            },
            mosaic_api::Error::Status { .. }
            | mosaic_api::Error::Transport(_)
            | mosaic_api::Error::Deserialization { .. } => CoreError::Api {
                status: err.status(),
                message: err.to_string(),
            },
            mosaic_api::Error::InvalidUrl(_)
            | mosaic_api::Error::Tls(_)
            | mosaic_api::Error::InvalidApiKey(_) => CoreError::Config {
                message: err.to_string(),
            },
        }
    }
}
