//! Config subcommand handlers.

use std::time::Duration;

use mosaic_core::DEFAULT_CANDIDATES;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;

const INIT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "poll_interval = {}", cfg.defaults.poll_interval);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "url = \"{}\"", p.url);
        if p.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        if let Some(ref env) = p.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(interval) = p.poll_interval {
            let _ = writeln!(out, "poll_interval = {interval}");
        }
    }

    out
}

/// `--url`, else the first add-on address that answers, else localhost.
async fn init_url(global: &GlobalOpts) -> String {
    if let Some(ref url) = global.url {
        return url.clone();
    }
    match mosaic_core::discover(DEFAULT_CANDIDATES, INIT_PROBE_TIMEOUT).await {
        Some((url, _)) => {
            if !global.quiet {
                eprintln!("Discovered Mosaic service at {url}");
            }
            url
        }
        None => Profile::default().url,
    }
}

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { keyring_key, force } => {
            let mut cfg = config::load_config_or_default();
            let name = config::active_profile_name(global, &cfg);

            if cfg.profiles.contains_key(&name) && !force {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: format!("profile '{name}' already exists (use --force to overwrite)"),
                });
            }

            let url = init_url(global).await;
            // Reject garbage before it lands on disk.
            mosaic_config::parse_url(&url)?;

            if let Some(ref key) = keyring_key {
                config::store_api_key(&name, key)?;
            }

            let profile = Profile {
                url,
                insecure: global.insecure.then_some(true),
                timeout: global.timeout,
                ..Profile::default()
            };
            cfg.profiles.insert(name.clone(), profile);
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(name.clone());
            }

            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Profile '{name}' written to {}", path.display());
                if keyring_key.is_some() {
                    eprintln!("API key stored in system keyring");
                }
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            if !global.quiet {
                print!("{}", format_config_redacted(&cfg));
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
