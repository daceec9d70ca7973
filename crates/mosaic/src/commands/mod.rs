//! Command dispatch: bridges CLI args -> coordinator calls -> output formatting.

pub mod config_cmd;
pub mod discover;
pub mod displays;
pub mod frame;
pub mod notify;
pub mod rotation;
pub mod status;
pub mod watch;

use mosaic_core::Coordinator;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    coordinator: &Coordinator,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(coordinator, global).await,
        Command::Displays(args) => displays::handle(coordinator, args, global).await,
        Command::Notify(args) => notify::handle(coordinator, args, global).await,
        Command::Rotation(args) => rotation::handle(coordinator, args, global).await,
        Command::Frame(args) => frame::handle(coordinator, args, global).await,
        Command::Watch(_) => watch::handle(coordinator, global).await,
        // Handled before a coordinator exists
        Command::Config(_) | Command::Discover(_) | Command::Completions(_) => Ok(()),
    }
}
