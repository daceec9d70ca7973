// Mosaic API types
//
// The service is loose about which fields it sends, so every field carries
// a serde default and anything undocumented lands in `extra`. Defaults
// match what the display firmware assumes when a key is missing. A key
// that is present but null or of the wrong type takes the same default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ── Display ──────────────────────────────────────────────────────────

/// One addressable LED panel as reported by `/api/displays`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Display {
    #[serde(default = "default_display_id", deserialize_with = "lenient_display_id")]
    pub id: String,
    #[serde(default = "default_display_name", deserialize_with = "lenient_display_name")]
    pub name: String,
    #[serde(default = "default_width", deserialize_with = "lenient_width")]
    pub width: u32,
    #[serde(default = "default_height", deserialize_with = "lenient_height")]
    pub height: u32,
    /// 0-100.
    #[serde(default = "default_brightness", deserialize_with = "lenient_brightness")]
    pub brightness: u8,
    #[serde(default = "default_true", deserialize_with = "lenient_true")]
    pub power: bool,
    /// App currently on screen, if the service reports one.
    #[serde(default, deserialize_with = "lenient_option")]
    pub current_app: Option<String>,
    #[serde(default = "default_true", deserialize_with = "lenient_true")]
    pub rotation_enabled: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            id: default_display_id(),
            name: default_display_name(),
            width: default_width(),
            height: default_height(),
            brightness: default_brightness(),
            power: true,
            current_app: None,
            rotation_enabled: true,
            extra: Map::new(),
        }
    }
}

fn default_display_id() -> String {
    "default".into()
}
fn default_display_name() -> String {
    "Mosaic".into()
}
fn default_width() -> u32 {
    64
}
fn default_height() -> u32 {
    32
}
fn default_brightness() -> u8 {
    80
}
fn default_true() -> bool {
    true
}

// ── Lenient field decoding ───────────────────────────────────────────

/// Decode `T`, or `None` when the value is null or the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_or<'de, D, T>(deserializer: D, default: fn() -> T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient(deserializer)?.unwrap_or_else(default))
}

fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    lenient(deserializer)
}

fn lenient_display_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient_or(d, default_display_id)
}
fn lenient_display_name<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient_or(d, default_display_name)
}
fn lenient_width<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    lenient_or(d, default_width)
}
fn lenient_height<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    lenient_or(d, default_height)
}
fn lenient_brightness<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    lenient_or(d, default_brightness)
}
fn lenient_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    lenient_or(d, default_true)
}
fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    lenient_or(d, Vec::new)
}

/// Body for `POST /api/displays`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterDisplay {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub client_type: String,
}

impl RegisterDisplay {
    /// A 64x32 web client, the size the add-on creates by default.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width: default_width(),
            height: default_height(),
            client_type: "web".into(),
        }
    }
}

// ── Rotation ─────────────────────────────────────────────────────────

/// App rotation settings for a single display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default = "default_true", deserialize_with = "lenient_true")]
    pub enabled: bool,
    /// Seconds each app stays on screen.
    #[serde(default, deserialize_with = "lenient_option")]
    pub dwell_seconds: Option<u32>,
    /// App ids in rotation order.
    #[serde(default, deserialize_with = "lenient_list")]
    pub apps: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for RotationConfig {
    /// `{enabled: true, apps: []}`: what a display is assumed to run when
    /// its rotation endpoint can't be read.
    fn default() -> Self {
        Self {
            enabled: true,
            dwell_seconds: None,
            apps: Vec::new(),
            extra: Map::new(),
        }
    }
}

// ── Notifications ────────────────────────────────────────────────────

/// Notification priority. Sticky notifications stay until cleared.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Sticky,
}

/// A text notification for `POST /api/notify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextNotification {
    /// Display id, or `"all"`.
    pub display: String,
    pub text: String,
    pub duration: u32,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// An image notification for `POST /api/notify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageNotification {
    /// Display id, or `"all"`.
    pub display: String,
    /// Image URL or base64 payload, passed through untouched.
    pub image: String,
    pub duration: u32,
    pub priority: Priority,
}

/// Wire shape of `/api/notify`: the payload plus a `type` discriminator.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum NotifyBody<'a> {
    Text(&'a TextNotification),
    Image(&'a ImageNotification),
}

// ── Status ───────────────────────────────────────────────────────────

/// Response of `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    #[serde(default, deserialize_with = "lenient_option")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_missing_fields_take_defaults() {
        let display: Display = serde_json::from_value(json!({ "id": "lobby" })).unwrap();
        assert_eq!(display.id, "lobby");
        assert_eq!(display.name, "Mosaic");
        assert_eq!((display.width, display.height), (64, 32));
        assert_eq!(display.brightness, 80);
        assert!(display.power);
        assert!(display.rotation_enabled);
        assert_eq!(display.current_app, None);
    }

    #[test]
    fn display_keeps_unknown_fields() {
        let display: Display =
            serde_json::from_value(json!({ "id": "a", "position": "wall" })).unwrap();
        assert_eq!(display.extra.get("position"), Some(&json!("wall")));
    }

    #[test]
    fn null_and_mistyped_fields_take_defaults() {
        let display: Display = serde_json::from_value(json!({
            "id": "hall",
            "name": null,
            "brightness": null,
            "width": 64.5,
            "power": "yes",
            "current_app": 7
        }))
        .unwrap();
        assert_eq!(display.id, "hall");
        assert_eq!(display.name, "Mosaic");
        assert_eq!(display.brightness, 80);
        assert_eq!(display.width, 64);
        assert!(display.power);
        assert_eq!(display.current_app, None);
    }

    #[test]
    fn out_of_range_brightness_takes_default() {
        let display: Display =
            serde_json::from_value(json!({ "id": "a", "brightness": 300 })).unwrap();
        assert_eq!(display.brightness, 80);
    }

    #[test]
    fn rotation_tolerates_bad_apps() {
        let rotation: RotationConfig =
            serde_json::from_value(json!({ "enabled": null, "apps": "clock" })).unwrap();
        assert!(rotation.enabled);
        assert!(rotation.apps.is_empty());
    }

    #[test]
    fn rotation_default_is_enabled_and_empty() {
        let rotation = RotationConfig::default();
        assert!(rotation.enabled);
        assert!(rotation.apps.is_empty());
    }

    #[test]
    fn text_notification_wire_shape() {
        let n = TextNotification {
            display: "all".into(),
            text: "Hello".into(),
            duration: 10,
            priority: Priority::Normal,
            color: Some("#FFFFFF".into()),
            font: None,
        };
        assert_eq!(
            serde_json::to_value(NotifyBody::Text(&n)).unwrap(),
            json!({
                "display": "all",
                "type": "text",
                "text": "Hello",
                "duration": 10,
                "priority": "normal",
                "color": "#FFFFFF"
            })
        );
    }

    #[test]
    fn priority_parses_lowercase() {
        assert_eq!("sticky".parse::<Priority>().unwrap(), Priority::Sticky);
        assert_eq!(Priority::High.to_string(), "high");
        assert!("urgent".parse::<Priority>().is_err());
    }
}
