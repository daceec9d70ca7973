// ── Service auto-detection ──
//
// Probes well-known add-on addresses and returns the first one whose
// status endpoint answers.

use std::time::Duration;

use tracing::debug;

use mosaic_api::{MosaicClient, ServerStatus, TlsMode, TransportConfig};

/// Where a Mosaic add-on usually listens.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "http://a0d7b954-mosaic:8176",
    "http://localhost:8176",
    "http://127.0.0.1:8176",
];

/// Probe `candidates` in order with `get_status`.
///
/// Returns the first URL that answers, with its status. Candidates that
/// don't parse, refuse, or time out are skipped.
pub async fn discover<S: AsRef<str>>(
    candidates: &[S],
    timeout: Duration,
) -> Option<(String, ServerStatus)> {
    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout,
    };

    for candidate in candidates {
        let url = candidate.as_ref();
        let client = match MosaicClient::with_transport(url, None, transport.clone()) {
            Ok(client) => client,
            Err(e) => {
                debug!(url, error = %e, "skipping candidate");
                continue;
            }
        };
        let result = client.get_status().await;
        client.close();
        match result {
            Ok(status) => {
                debug!(url, "found Mosaic service");
                return Some((url.trim_end_matches('/').to_owned(), status));
            }
            Err(e) => debug!(url, error = %e, "candidate did not answer"),
        }
    }
    None
}
