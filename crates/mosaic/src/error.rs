//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use mosaic_config::ConfigError;
use mosaic_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Mosaic at {url}")]
    #[diagnostic(
        code(mosaic::connection_failed),
        help(
            "Check that the Mosaic service is running and reachable.\n\
             URL: {url}\n\
             Try: mosaic discover"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(mosaic::timeout),
        help("Increase the timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Could not refresh display state: {message}")]
    #[diagnostic(code(mosaic::update_failed))]
    UpdateFailed { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Service rejected the API key ({status})")]
    #[diagnostic(
        code(mosaic::auth_failed),
        help(
            "Pass --api-key, set MOSAIC_API_KEY, or store a key with:\n\
             mosaic config init --keyring-key <KEY>"
        )
    )]
    AuthFailed { status: u16 },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(mosaic::not_found),
        help("Run: mosaic {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(mosaic::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mosaic::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mosaic::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mosaic config init --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No Mosaic service configured")]
    #[diagnostic(
        code(mosaic::no_config),
        help(
            "Pass --url, set MOSAIC_URL, or create a profile with: mosaic config init\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("No Mosaic service answered")]
    #[diagnostic(
        code(mosaic::not_discovered),
        help("Probed: {probed}\nPass --candidate <URL> to try other addresses.")
    )]
    NothingDiscovered { probed: String },

    #[error(transparent)]
    #[diagnostic(code(mosaic::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::NothingDiscovered { .. } => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::UpdateFailed { message } => CliError::UpdateFailed { message },

            CoreError::Api {
                status: Some(status @ (401 | 403)),
                ..
            } => CliError::AuthFailed { status },

            CoreError::Api { message, .. } | CoreError::NotReady { message } => {
                CliError::Api { message }
            }

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "connection settings".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_get_their_own_exit_code() {
        let err = CliError::from(CoreError::Api {
            message: "API error 401: unauthorized".into(),
            status: Some(401),
        });
        assert!(matches!(err, CliError::AuthFailed { status: 401 }));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn other_api_errors_keep_the_service_message() {
        let err = CliError::from(CoreError::Api {
            message: "API error 500: boom".into(),
            status: Some(500),
        });
        assert_eq!(err.to_string(), "API error 500: boom");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn timeouts_map_to_timeout_exit_code() {
        let err = CliError::from(CoreError::Timeout { timeout_secs: 10 });
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }
}
