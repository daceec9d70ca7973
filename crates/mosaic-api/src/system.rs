// Service-level endpoints: status probe and frame capture.

use bytes::Bytes;

use crate::client::MosaicClient;
use crate::error::Error;
use crate::models::ServerStatus;

impl MosaicClient {
    /// `GET /api/status`
    pub async fn get_status(&self) -> Result<ServerStatus, Error> {
        let url = self.endpoint(&["api", "status"]);
        self.get(url).await
    }

    /// Grab the frame currently shown on a display as raw bytes.
    ///
    /// `GET /frame?display={id}&format={fmt}`. The body is returned
    /// untouched; `format` is whatever the service supports (`png`, `gif`, ...).
    pub async fn get_frame(&self, display_id: &str, format: &str) -> Result<Bytes, Error> {
        let url = self.endpoint(&["frame"]);
        self.get_bytes(url, &[("display", display_id), ("format", format)])
            .await
    }
}
