// Mosaic HTTP client
//
// Wraps `reqwest::Client` with URL construction, auth headers, and
// response classification. Endpoint groups (displays, rotation, notify,
// system) are implemented as inherent methods in separate files so this
// module stays focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Async client for the Mosaic display service.
///
/// Construction never touches the network. The underlying connection pool
/// is built on the first request, shared by every concurrent call, and
/// released by [`close()`](Self::close). Each public method maps to exactly
/// one HTTP request; nothing is retried.
pub struct MosaicClient {
    base_url: Url,
    api_key: Option<SecretString>,
    transport: TransportConfig,
    /// Lazily built pool. `reqwest::Client` is an `Arc` internally, so
    /// handing out clones is cheap and never holds this lock across I/O.
    http: RwLock<Option<reqwest::Client>>,
}

impl MosaicClient {
    /// Create a client for `base_url` with an optional bearer token.
    ///
    /// `verify_tls: false` accepts self-signed certificates.
    pub fn new(
        base_url: &str,
        api_key: Option<SecretString>,
        verify_tls: bool,
    ) -> Result<Self, Error> {
        Self::with_transport(base_url, api_key, TransportConfig::from_verify_flag(verify_tls))
    }

    /// Create a client with an explicit transport configuration.
    pub fn with_transport(
        base_url: &str,
        api_key: Option<SecretString>,
        transport: TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self {
            base_url,
            api_key,
            transport,
            http: RwLock::new(None),
        })
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The transport settings used when the pool is (re)built.
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Whether a connection pool is currently held.
    pub fn is_open(&self) -> bool {
        self.http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Release the connection pool.
    ///
    /// Idempotent: closing an already-closed client does nothing. A request
    /// issued after `close()` builds a fresh pool.
    pub fn close(&self) {
        let released = self
            .http
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if released.is_some() {
            debug!(base_url = %self.base_url, "connection pool released");
        }
    }

    // ── Pool management ──────────────────────────────────────────────

    fn http(&self) -> Result<reqwest::Client, Error> {
        {
            let guard = self.http.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(client) = guard.as_ref() {
                return Ok(client.clone());
            }
        }

        let mut guard = self.http.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }
        debug!(base_url = %self.base_url, "building connection pool");
        let client = self.transport.build_client(self.default_headers()?)?;
        *guard = Some(client.clone());
        Ok(client)
    }

    fn default_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|e| Error::InvalidApiKey(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// `endpoint(&["api", "displays", id])` → `{base}/api/displays/{id}`
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor: the base URL can always carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, Error> {
        debug!("{method} {url}");
        Ok(self.http()?.request(method, url))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.send(self.request(Method::GET, url)?).await?;
        self.decode(resp).await
    }

    pub(crate) async fn get_bytes(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<Bytes, Error> {
        let resp = self
            .send(self.request(Method::GET, url)?.query(params))
            .await?;
        resp.bytes().await.map_err(|e| self.classify(e))
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self
            .send(self.request(Method::POST, url)?.json(body))
            .await?;
        self.decode(resp).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.send(self.request(Method::POST, url)?).await?;
        self.decode(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self.send(self.request(Method::PUT, url)?.json(body)).await?;
        self.decode(resp).await
    }

    pub(crate) async fn delete_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let resp = self
            .send(self.request(Method::DELETE, url)?.query(params))
            .await?;
        self.decode(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Send the request; anything but `200 OK` becomes [`Error::Status`].
    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = builder.send().await.map_err(|e| self.classify(e))?;
        let status = resp.status();
        if status == StatusCode::OK {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_else(|e| {
            debug!(status = status.as_u16(), error = %e, "failed to read error body");
            String::new()
        });
        Err(Error::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await.map_err(|e| self.classify(e))?;
        // Acknowledgement endpoints may answer 200 with an empty body.
        let text = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(text).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Separate timeouts from every other transport failure.
    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.transport.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let client = MosaicClient::new("http://mosaic.local:8176/", None, true).unwrap();
        assert_eq!(
            client.endpoint(&["api", "status"]).as_str(),
            "http://mosaic.local:8176/api/status"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let client = MosaicClient::new("http://proxy.local/mosaic", None, true).unwrap();
        assert_eq!(
            client.endpoint(&["api", "displays"]).as_str(),
            "http://proxy.local/mosaic/api/displays"
        );
    }

    #[test]
    fn display_ids_are_percent_encoded() {
        let client = MosaicClient::new("http://mosaic.local:8176", None, true).unwrap();
        assert_eq!(
            client.endpoint(&["api", "displays", "front door"]).as_str(),
            "http://mosaic.local:8176/api/displays/front%20door"
        );
    }

    #[test]
    fn construction_does_not_build_a_pool() {
        let client = MosaicClient::new("http://mosaic.local:8176", None, false).unwrap();
        assert!(!client.is_open());
    }

    #[test]
    fn rejects_unparseable_url() {
        assert!(matches!(
            MosaicClient::new("not a url", None, true),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejects_cannot_be_a_base_url() {
        assert!(matches!(
            MosaicClient::new("mailto:ops@example.com", None, true),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let client = MosaicClient::new(
            "http://mosaic.local:8176",
            Some(SecretString::from("s3cret".to_string())),
            true,
        )
        .unwrap();
        let headers = client.default_headers().unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().unwrap(), "Bearer s3cret");
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/json"
        );
    }
}
