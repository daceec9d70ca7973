//! Rotation command handlers.

use serde::Serialize;

use mosaic_core::{Coordinator, CoreError, RotationConfig};

use crate::cli::{GlobalOpts, RotationArgs, RotationCommand};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct RotationView<'a> {
    display: &'a str,
    #[serde(flatten)]
    rotation: &'a RotationConfig,
}

fn detail(view: &RotationView<'_>, color: bool) -> String {
    let r = view.rotation;
    let mut lines = vec![
        format!("Display: {}", view.display),
        format!("Enabled: {}", output::on_off(r.enabled, color)),
        format!(
            "Dwell:   {}",
            r.dwell_seconds.map_or_else(|| "-".into(), |s| format!("{s}s"))
        ),
        format!("Apps:    {}", r.apps.len()),
    ];
    for (i, app) in r.apps.iter().enumerate() {
        lines.push(format!("  {}. {app}", i + 1));
    }
    lines.join("\n")
}

pub async fn handle(
    coordinator: &Coordinator,
    args: RotationArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RotationCommand::Get { display } => {
            // Read straight from the service so a failure is reported
            // instead of falling back to the default entry.
            let rotation = coordinator
                .client()
                .get_rotation_config(&display)
                .await
                .map_err(CoreError::from)?;
            let view = RotationView {
                display: &display,
                rotation: &rotation,
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &view,
                |v| detail(v, color),
                |v| v.rotation.apps.join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RotationCommand::Enable { display } => {
            let ack = coordinator.set_rotation_enabled(&display, true).await?;
            let message = format!("Rotation enabled on {display}");
            output::print_ack(&global.output, &ack, &message, global.quiet);
            Ok(())
        }

        RotationCommand::Disable { display } => {
            let ack = coordinator.set_rotation_enabled(&display, false).await?;
            let message = format!("Rotation disabled on {display}");
            output::print_ack(&global.output, &ack, &message, global.quiet);
            Ok(())
        }

        RotationCommand::Skip { display } => {
            let ack = coordinator.skip(&display).await?;
            let message = format!("Skipped to next app on {display}");
            output::print_ack(&global.output, &ack, &message, global.quiet);
            Ok(())
        }

        RotationCommand::ShowApp {
            display,
            app,
            duration,
        } => {
            let ack = coordinator.show_app(&display, &app, duration).await?;
            let message = format!("Showing {app} on {display} for {duration}s");
            output::print_ack(&global.output, &ack, &message, global.quiet);
            Ok(())
        }
    }
}
