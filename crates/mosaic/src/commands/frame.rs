//! Frame capture handler.

use std::io::Write;
use std::path::PathBuf;

use mosaic_core::{Coordinator, CoreError};

use crate::cli::{FrameArgs, GlobalOpts};
use crate::error::CliError;

pub async fn handle(
    coordinator: &Coordinator,
    args: FrameArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let frame = coordinator
        .client()
        .get_frame(&args.display, &args.format)
        .await
        .map_err(CoreError::from)?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("{}.{}", args.display, args.format)));

    if out.as_os_str() == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&frame)?;
        stdout.flush()?;
        return Ok(());
    }

    std::fs::write(&out, &frame)?;
    if !global.quiet {
        eprintln!("Wrote {} bytes to {}", frame.len(), out.display());
    }
    Ok(())
}
