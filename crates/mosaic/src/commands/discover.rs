//! Service discovery handler.

use serde::Serialize;

use mosaic_core::{DEFAULT_CANDIDATES, ServerStatus};

use crate::cli::{DiscoverArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Discovered {
    url: String,
    server: ServerStatus,
}

fn detail(d: &Discovered) -> String {
    [
        format!("URL:     {}", d.url),
        format!("Status:  {}", d.server.status.as_deref().unwrap_or("-")),
        format!("Version: {}", d.server.version.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub async fn handle(args: DiscoverArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let candidates: Vec<String> = if args.candidates.is_empty() {
        DEFAULT_CANDIDATES.iter().map(|c| (*c).to_owned()).collect()
    } else {
        args.candidates
    };

    let Some((url, server)) = mosaic_core::discover(&candidates, args.probe_timeout).await else {
        return Err(CliError::NothingDiscovered {
            probed: candidates.join(", "),
        });
    };

    if args.save {
        let mut cfg = config::load_config_or_default();
        let name = config::active_profile_name(global, &cfg);
        let profile = cfg.profiles.entry(name.clone()).or_default();
        profile.url.clone_from(&url);
        if cfg.default_profile.is_none() {
            cfg.default_profile = Some(name.clone());
        }
        let path = config::save_config(&cfg)?;
        if !global.quiet {
            eprintln!("Saved {url} to profile '{name}' in {}", path.display());
        }
    }

    let found = Discovered { url, server };
    let out = output::render_single(&global.output, &found, detail, |d| d.url.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
