//! Configuration for Mosaic tools.
//!
//! TOML profiles, API-key resolution (env + keyring + plaintext), and
//! translation to `mosaic_core::CoordinatorConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mosaic_core::{CoordinatorConfig, DEFAULT_PORT, TlsMode};

/// Keyring service name API keys are stored under.
pub const KEYRING_SERVICE: &str = "mosaic";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Refresh interval in seconds for `watch`.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_poll_interval() -> u64 {
    30
}

/// A named Mosaic service profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "http://localhost:8176").
    #[serde(default = "default_url")]
    pub url: String,

    /// API key (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override refresh interval (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            api_key_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            poll_interval: None,
        }
    }
}

fn default_url() -> String {
    format!("http://localhost:{DEFAULT_PORT}")
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "mosaic", "mosaic").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mosaic");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + `MOSAIC_`-prefixed environment.
///
/// A missing file is not an error; nested keys use a double underscore
/// (`MOSAIC_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MOSAIC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the profile's API key, if one is configured anywhere.
///
/// Order: env var named by `api_key_env`, system keyring, plaintext.
/// Mosaic services may run without auth, so no key is not an error.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(val) = profile
        .api_key_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Some(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring_entry(profile_name).and_then(|e| e.get_password().ok()) {
        return Some(SecretString::from(secret));
    }

    // 3. Plaintext in config
    profile.api_key.clone().map(SecretString::from)
}

/// Store an API key in the system keyring for `profile_name`.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    let entry = keyring_entry(profile_name).ok_or_else(|| ConfigError::Validation {
        field: "keyring".into(),
        reason: "system keyring unavailable".into(),
    })?;
    entry.set_password(key).map_err(|e| ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    })
}

fn keyring_entry(profile_name: &str) -> Option<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key")).ok()
}

/// Build a `CoordinatorConfig` from a profile and the global defaults,
/// with no CLI flag overrides.
pub fn profile_to_coordinator_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<CoordinatorConfig, ConfigError> {
    let url = parse_url(&profile.url)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok(CoordinatorConfig {
        url,
        api_key: resolve_api_key(profile, profile_name),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        poll_interval: Duration::from_secs(profile.poll_interval.unwrap_or(defaults.poll_interval)),
    })
}

/// Parse a service URL, rejecting anything that isn't http(s).
pub fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("unsupported scheme '{other}' (expected http or https)"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile_name(), "default");
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.poll_interval, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_parse_from_toml() {
        let (_dir, path) = write_config(
            r#"
            default_profile = "home"

            [defaults]
            output = "json"

            [profiles.home]
            url = "http://mosaic.local:8176"
            api_key = "plain"
            poll_interval = 5

            [profiles.bare]
            "#,
        );
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile_name(), "home");
        assert_eq!(cfg.defaults.output, "json");

        let home = cfg.profile("home").unwrap();
        assert_eq!(home.url, "http://mosaic.local:8176");
        assert_eq!(home.poll_interval, Some(5));

        let bare = cfg.profile("bare").unwrap();
        assert_eq!(bare.url, "http://localhost:8176");

        assert!(matches!(
            cfg.profile("office"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn coordinator_config_applies_profile_over_defaults() {
        let profile = Profile {
            url: "https://mosaic.example.com".into(),
            api_key: Some("plain-key".into()),
            insecure: Some(true),
            poll_interval: Some(5),
            ..Profile::default()
        };
        let cfg = profile_to_coordinator_config(
            &profile,
            "mosaic-config-test-nonexistent",
            &Defaults::default(),
        )
        .unwrap();

        assert_eq!(cfg.url.as_str(), "https://mosaic.example.com/");
        assert_eq!(cfg.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn custom_ca_is_used_when_verifying() {
        let profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/mosaic/ca.pem")),
            ..Profile::default()
        };
        let cfg = profile_to_coordinator_config(&profile, "x", &Defaults::default()).unwrap();
        assert_eq!(cfg.tls, TlsMode::CustomCa(PathBuf::from("/etc/mosaic/ca.pem")));
    }

    #[test]
    fn api_key_env_takes_precedence_over_plaintext() {
        // PATH is always set, so it stands in for a key variable.
        let profile = Profile {
            api_key: Some("plain".into()),
            api_key_env: Some("PATH".into()),
            ..Profile::default()
        };
        let key = resolve_api_key(&profile, "mosaic-config-test-nonexistent").unwrap();
        assert_eq!(key.expose_secret(), std::env::var("PATH").unwrap());
    }

    #[test]
    fn invalid_urls_are_rejected() {
        assert!(matches!(
            parse_url("not a url"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            parse_url("ftp://mosaic.local"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(parse_url("http://mosaic.local:8176").is_ok());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                url: "http://10.0.0.5:8176".into(),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("api_key"));

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profile("default").unwrap().url, "http://10.0.0.5:8176");
    }
}
