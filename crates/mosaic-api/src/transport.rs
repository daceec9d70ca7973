// Transport configuration for building the reqwest::Client that backs
// a `MosaicClient`'s connection pool.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

/// Per-request timeout applied to every call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// TLS verification mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (add-on behind a self-signed proxy).
    DangerAcceptInvalid,
}

/// Transport settings shared by every request a client issues.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Map a plain verify-TLS flag onto a transport config.
    pub fn from_verify_flag(verify_tls: bool) -> Self {
        Self {
            tls: if verify_tls {
                TlsMode::System
            } else {
                TlsMode::DangerAcceptInvalid
            },
            ..Self::default()
        }
    }

    /// Build a `reqwest::Client` carrying the given default headers.
    pub fn build_client(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("mosaic/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn verify_flag_selects_tls_mode() {
        assert_eq!(TransportConfig::from_verify_flag(true).tls, TlsMode::System);
        assert_eq!(
            TransportConfig::from_verify_flag(false).tls,
            TlsMode::DangerAcceptInvalid
        );
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        assert_eq!(TransportConfig::default().timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/mosaic-ca.pem")),
            timeout: REQUEST_TIMEOUT,
        };
        let err = config.build_client(HeaderMap::new()).unwrap_err();
        assert!(matches!(err, Error::Tls(_)), "got {err:?}");
    }
}
