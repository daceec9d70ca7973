// ── Command API ──
//
// Every mutating operation the coordinator supports is a `Command`
// variant. Service calls arrive as a name plus a JSON payload and are
// validated into a `Command` before anything is sent.

pub mod requests;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;

pub use requests::{
    ALL_DISPLAYS, ClearRequest, PushImageRequest, PushTextRequest, SetBrightnessRequest,
    SetPowerRequest, SetRotationRequest, ShowAppRequest, SkipRequest,
};

/// Highest brightness the service accepts.
pub const MAX_BRIGHTNESS: u8 = 100;

/// All write operations against a Mosaic service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ── Notifications ────────────────────────────────────────────────
    PushText(PushTextRequest),
    PushImage(PushImageRequest),
    Clear(ClearRequest),

    // ── Rotation ─────────────────────────────────────────────────────
    ShowApp(ShowAppRequest),
    SetRotationEnabled(SetRotationRequest),
    Skip(SkipRequest),

    // ── Display settings ─────────────────────────────────────────────
    SetBrightness(SetBrightnessRequest),
    SetPower(SetPowerRequest),
}

impl Command {
    /// Service names accepted by [`from_service_call`](Self::from_service_call).
    pub const SERVICES: &'static [&'static str] = &[
        "push_text",
        "push_image",
        "clear",
        "show_app",
        "set_rotation",
        "skip",
        "set_brightness",
        "set_power",
    ];

    /// Parse a service call into a validated command.
    ///
    /// `data` may be `null` for services whose fields all have defaults.
    pub fn from_service_call(service: &str, data: Value) -> Result<Self, CoreError> {
        let command = match service {
            "push_text" => Self::PushText(parse(service, data)?),
            "push_image" => Self::PushImage(parse(service, data)?),
            "clear" => Self::Clear(parse(service, data)?),
            "show_app" => Self::ShowApp(parse(service, data)?),
            "set_rotation" => Self::SetRotationEnabled(parse(service, data)?),
            "skip" => Self::Skip(parse(service, data)?),
            "set_brightness" => Self::SetBrightness(parse(service, data)?),
            "set_power" => Self::SetPower(parse(service, data)?),
            other => {
                return Err(CoreError::Validation {
                    message: format!(
                        "unknown service '{other}' (expected one of: {})",
                        Self::SERVICES.join(", ")
                    ),
                });
            }
        };
        command.validate()?;
        Ok(command)
    }

    /// The service name this command corresponds to.
    pub fn service(&self) -> &'static str {
        match self {
            Self::PushText(_) => "push_text",
            Self::PushImage(_) => "push_image",
            Self::Clear(_) => "clear",
            Self::ShowApp(_) => "show_app",
            Self::SetRotationEnabled(_) => "set_rotation",
            Self::Skip(_) => "skip",
            Self::SetBrightness(_) => "set_brightness",
            Self::SetPower(_) => "set_power",
        }
    }

    /// The display id (or `"all"`) the command addresses.
    pub fn target(&self) -> &str {
        match self {
            Self::PushText(r) => &r.target,
            Self::PushImage(r) => &r.target,
            Self::Clear(r) => &r.target,
            Self::ShowApp(r) => &r.target,
            Self::SetRotationEnabled(r) => &r.target,
            Self::Skip(r) => &r.target,
            Self::SetBrightness(r) => &r.target,
            Self::SetPower(r) => &r.target,
        }
    }

    /// Reject payloads that parse but can't be sent.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.target().trim().is_empty() {
            return Err(invalid(format!("{} requires a target", self.service())));
        }
        match self {
            Self::ShowApp(r) if r.app.trim().is_empty() => {
                Err(invalid("show_app requires target and app"))
            }
            Self::SetBrightness(r) if r.brightness > MAX_BRIGHTNESS => Err(invalid(format!(
                "brightness must be 0-{MAX_BRIGHTNESS}, got {}",
                r.brightness
            ))),
            _ => Ok(()),
        }
    }
}

fn parse<T: DeserializeOwned>(service: &str, data: Value) -> Result<T, CoreError> {
    let data = if data.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        data
    };
    serde_json::from_value(data).map_err(|e| invalid(format!("invalid {service} data: {e}")))
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::Validation {
        message: message.into(),
    }
}
