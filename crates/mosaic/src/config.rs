//! CLI configuration: thin wrapper around `mosaic_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --api-key, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use mosaic_core::{CoordinatorConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use mosaic_config::{
    Config, Profile, config_path, load_config_or_default, save_config, store_api_key,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Build a `CoordinatorConfig` from the config file, profile, and flags.
///
/// Flags win over the profile. With no matching profile, `--url` alone is
/// enough; an explicitly requested profile that doesn't exist is an error.
pub fn build_coordinator_config(global: &GlobalOpts) -> Result<CoordinatorConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut resolved =
            mosaic_config::profile_to_coordinator_config(profile, &profile_name, &cfg.defaults)?;
        apply_overrides(&mut resolved, global)?;
        return Ok(resolved);
    }

    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    let url = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let mut resolved = CoordinatorConfig::new(mosaic_config::parse_url(url)?);
    resolved.timeout = Duration::from_secs(cfg.defaults.timeout);
    resolved.poll_interval = Duration::from_secs(cfg.defaults.poll_interval);
    if cfg.defaults.insecure {
        resolved.tls = TlsMode::DangerAcceptInvalid;
    }
    apply_overrides(&mut resolved, global)?;
    Ok(resolved)
}

fn apply_overrides(resolved: &mut CoordinatorConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref url) = global.url {
        resolved.url = mosaic_config::parse_url(url)?;
    }
    if let Some(ref key) = global.api_key {
        resolved.api_key = Some(SecretString::from(key.clone()));
    }
    if global.insecure {
        resolved.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        resolved.timeout = Duration::from_secs(secs);
    }
    Ok(())
}

/// Comma-separated profile names, or "(none)".
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
