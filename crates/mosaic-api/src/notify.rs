// Notification endpoints

use serde_json::Value;
use tracing::debug;

use crate::client::MosaicClient;
use crate::error::Error;
use crate::models::{ImageNotification, NotifyBody, TextNotification};

impl MosaicClient {
    /// `POST /api/notify` with `type: "text"`
    pub async fn push_text(&self, notification: &TextNotification) -> Result<Value, Error> {
        let url = self.endpoint(&["api", "notify"]);
        debug!(
            display = %notification.display,
            priority = %notification.priority,
            "pushing text"
        );
        self.post(url, &NotifyBody::Text(notification)).await
    }

    /// `POST /api/notify` with `type: "image"`
    pub async fn push_image(&self, notification: &ImageNotification) -> Result<Value, Error> {
        let url = self.endpoint(&["api", "notify"]);
        debug!(
            display = %notification.display,
            priority = %notification.priority,
            "pushing image"
        );
        self.post(url, &NotifyBody::Image(notification)).await
    }

    /// Drop queued and showing notifications on a display (or `"all"`).
    ///
    /// `DELETE /api/notify?display={id}`
    pub async fn clear(&self, display_id: &str) -> Result<Value, Error> {
        let url = self.endpoint(&["api", "notify"]);
        debug!(display_id, "clearing notifications");
        self.delete_with_params(url, &[("display", display_id)])
            .await
    }
}
