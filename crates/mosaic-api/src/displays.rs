// Display endpoints
//
// Listing, registration, and the partial-update PUT used for brightness
// and power.

use serde_json::{Value, json};
use tracing::debug;

use crate::client::MosaicClient;
use crate::error::Error;
use crate::models::{Display, RegisterDisplay};

impl MosaicClient {
    /// List every display known to the service.
    ///
    /// `GET /api/displays`. Older add-on builds answer with a bare list,
    /// newer ones with an id-keyed object or `{"displays": [...]}`; all three
    /// are accepted. For the keyed form, the key fills in a missing `id`.
    pub async fn get_displays(&self) -> Result<Vec<Display>, Error> {
        let url = self.endpoint(&["api", "displays"]);
        let body: Value = self.get(url).await?;
        parse_display_list(body)
    }

    /// Register a new display.
    ///
    /// `POST /api/displays`
    pub async fn register_display(&self, request: &RegisterDisplay) -> Result<Display, Error> {
        let url = self.endpoint(&["api", "displays"]);
        let display_id = request.id.as_str();
        debug!(display_id, "registering display");
        self.post(url, request).await
    }

    /// Fetch a single display.
    ///
    /// `GET /api/displays/{id}`
    pub async fn get_display(&self, display_id: &str) -> Result<Display, Error> {
        let url = self.endpoint(&["api", "displays", display_id]);
        self.get(url).await
    }

    /// Set brightness (0-100).
    ///
    /// `PUT /api/displays/{id}` with `{"brightness": n}`
    pub async fn set_brightness(&self, display_id: &str, brightness: u8) -> Result<Value, Error> {
        let url = self.endpoint(&["api", "displays", display_id]);
        debug!(display_id, brightness, "setting brightness");
        self.put(url, &json!({ "brightness": brightness })).await
    }

    /// Switch a display on or off.
    ///
    /// `PUT /api/displays/{id}` with `{"power": bool}`
    pub async fn set_power(&self, display_id: &str, power: bool) -> Result<Value, Error> {
        let url = self.endpoint(&["api", "displays", display_id]);
        debug!(display_id, power, "setting power");
        self.put(url, &json!({ "power": power })).await
    }
}

fn parse_display_list(body: Value) -> Result<Vec<Display>, Error> {
    let items: Vec<Value> = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("displays") {
            Some(Value::Array(items)) => items,
            Some(other) => return parse_display_list(other),
            None => map
                .into_iter()
                .map(|(key, mut value)| {
                    if let Value::Object(fields) = &mut value {
                        fields.entry("id").or_insert(Value::String(key));
                    }
                    value
                })
                .collect(),
        },
        Value::Null => Vec::new(),
        other => {
            return Err(Error::Deserialization {
                message: "expected a list or object of displays".into(),
                body: other.to_string(),
            });
        }
    };

    items
        .into_iter()
        .filter(|item| {
            let keep = item.is_object();
            if !keep {
                debug!(entry = %item, "skipping display entry that is not an object");
            }
            keep
        })
        .map(|item| {
            serde_json::from_value(item.clone()).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: item.to_string(),
            })
        })
        .collect()
}
