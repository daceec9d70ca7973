// ── Runtime coordinator configuration ──
//
// Describes how to reach one Mosaic service. Never touches disk: the CLI
// (via mosaic-config) builds a `CoordinatorConfig` and hands it in.

use std::time::Duration;

use mosaic_api::{REQUEST_TIMEOUT, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// Port the Mosaic add-on listens on.
pub const DEFAULT_PORT: u16 = 8176;

/// How often the coordinator re-fetches display state.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for a single coordinator session.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Service base URL (e.g. `http://localhost:8176`).
    pub url: Url,
    /// Optional bearer token.
    pub api_key: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Periodic refresh interval. Zero disables the background task.
    pub poll_interval: Duration,
}

impl CoordinatorConfig {
    /// Config for `url` with every other setting at its default.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            api_key: None,
            tls: TlsMode::System,
            timeout: REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
