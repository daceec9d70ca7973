// Rotation endpoints
//
// Per-display app cycling: read/toggle the config, skip ahead, or pin an
// app for a while.

use serde_json::{Value, json};
use tracing::debug;

use crate::client::MosaicClient;
use crate::error::Error;
use crate::models::RotationConfig;

impl MosaicClient {
    /// `GET /api/displays/{id}/rotation`
    pub async fn get_rotation_config(&self, display_id: &str) -> Result<RotationConfig, Error> {
        let url = self.endpoint(&["api", "displays", display_id, "rotation"]);
        self.get(url).await
    }

    /// Enable or disable app rotation.
    ///
    /// `PUT /api/displays/{id}/rotation` with `{"enabled": bool}`
    pub async fn set_rotation_enabled(
        &self,
        display_id: &str,
        enabled: bool,
    ) -> Result<Value, Error> {
        let url = self.endpoint(&["api", "displays", display_id, "rotation"]);
        debug!(display_id, enabled, "setting rotation");
        self.put(url, &json!({ "enabled": enabled })).await
    }

    /// Advance to the next app in rotation.
    ///
    /// `POST /api/displays/{id}/rotation/skip`
    pub async fn skip_app(&self, display_id: &str) -> Result<Value, Error> {
        let url = self.endpoint(&["api", "displays", display_id, "rotation", "skip"]);
        debug!(display_id, "skipping app");
        self.post_empty(url).await
    }

    /// Show `app_id` for `duration` seconds, then resume rotation.
    ///
    /// `POST /api/displays/{id}/rotation/show-app` with `{"app": ..., "duration": n}`
    pub async fn show_app(
        &self,
        display_id: &str,
        app_id: &str,
        duration: u32,
    ) -> Result<Value, Error> {
        let url = self.endpoint(&["api", "displays", display_id, "rotation", "show-app"]);
        debug!(display_id, app_id, duration, "showing app");
        self.post(url, &json!({ "app": app_id, "duration": duration }))
            .await
    }
}
