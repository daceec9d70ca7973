//! Live view: start the coordinator's refresh loop and print every snapshot.

use mosaic_core::{Coordinator, Display, RefreshState, Snapshot};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::commands::displays;
use crate::error::CliError;
use crate::output;

fn print_snapshot(snapshot: &Snapshot, global: &GlobalOpts) {
    let displays: Vec<Display> = snapshot.displays.values().cloned().collect();
    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        let at = snapshot
            .fetched_at
            .map_or_else(|| "-".into(), |t| t.format("%H:%M:%S").to_string());
        eprintln!("── {at} · {} display(s) ──", displays.len());
    }
    output::print_output(&displays::render_displays(&displays, global), global.quiet);
}

/// Runs until Ctrl-C. `--interval` is applied to the coordinator config
/// before construction.
pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    coordinator.start().await?;

    let mut snapshots = coordinator.subscribe();
    let mut state = coordinator.refresh_state();
    print_snapshot(snapshots.current(), global);

    loop {
        tokio::select! {
            biased;

            _ = tokio::signal::ctrl_c() => break,

            changed = snapshots.changed() => match changed {
                Some(snapshot) => print_snapshot(&snapshot, global),
                None => break,
            },

            result = state.changed() => {
                if result.is_err() {
                    break;
                }
                let current = state.borrow_and_update().clone();
                if let RefreshState::Failed { message } = current {
                    tracing::warn!(%message, "refresh failed; keeping last snapshot");
                    if !global.quiet {
                        eprintln!("refresh failed: {message}");
                    }
                }
            }
        }
    }

    Ok(())
}
