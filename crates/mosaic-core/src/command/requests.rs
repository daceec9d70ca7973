// ── Typed request structs for Command payloads ──
//
// Each struct doubles as the schema for its service call: missing keys
// take the defaults a home-automation caller expects.

use serde::{Deserialize, Serialize};

use mosaic_api::{ImageNotification, Priority, TextNotification};

/// Target that addresses every display at once.
pub const ALL_DISPLAYS: &str = "all";

fn default_target() -> String {
    ALL_DISPLAYS.into()
}
fn default_notify_duration() -> u32 {
    10
}
fn default_show_duration() -> u32 {
    30
}
fn default_color() -> String {
    "#FFFFFF".into()
}
fn default_font() -> String {
    "default".into()
}

// ── Notifications ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTextRequest {
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub text: String,
    /// Seconds on screen.
    #[serde(default = "default_notify_duration")]
    pub duration: u32,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_font")]
    pub font: String,
}

impl Default for PushTextRequest {
    fn default() -> Self {
        Self {
            target: default_target(),
            text: String::new(),
            duration: default_notify_duration(),
            priority: Priority::default(),
            color: default_color(),
            font: default_font(),
        }
    }
}

impl PushTextRequest {
    pub fn new(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_notification(&self) -> TextNotification {
        TextNotification {
            display: self.target.clone(),
            text: self.text.clone(),
            duration: self.duration,
            priority: self.priority,
            color: Some(self.color.clone()),
            font: Some(self.font.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushImageRequest {
    #[serde(default = "default_target")]
    pub target: String,
    /// Image URL or base64 payload.
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_notify_duration")]
    pub duration: u32,
    #[serde(default)]
    pub priority: Priority,
}

impl Default for PushImageRequest {
    fn default() -> Self {
        Self {
            target: default_target(),
            image: String::new(),
            duration: default_notify_duration(),
            priority: Priority::default(),
        }
    }
}

impl PushImageRequest {
    pub fn new(target: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            image: image.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_notification(&self) -> ImageNotification {
        ImageNotification {
            display: self.target.clone(),
            image: self.image.clone(),
            duration: self.duration,
            priority: self.priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearRequest {
    #[serde(default = "default_target")]
    pub target: String,
}

impl Default for ClearRequest {
    fn default() -> Self {
        Self {
            target: default_target(),
        }
    }
}

// ── Rotation ───────────────────────────────────────────────────────

/// Show one app immediately. Both `target` and `app` are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowAppRequest {
    pub target: String,
    pub app: String,
    #[serde(default = "default_show_duration")]
    pub duration: u32,
}

impl ShowAppRequest {
    pub fn new(target: impl Into<String>, app: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            app: app.into(),
            duration: default_show_duration(),
        }
    }
}

// ── Display settings ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBrightnessRequest {
    pub target: String,
    /// 0-100.
    pub brightness: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPowerRequest {
    pub target: String,
    pub power: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRotationRequest {
    pub target: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRequest {
    pub target: String,
}
