//! Display command handlers.

use tabled::Tabled;

use mosaic_core::{Coordinator, CoreError, Display, DisplayStatus, RegisterDisplay};

use crate::cli::{DisplaysArgs, DisplaysCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct DisplayRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Brightness")]
    brightness: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Rotation")]
    rotation: String,
    #[tabled(rename = "Current App")]
    current_app: String,
}

pub(crate) fn display_row(d: &Display, color: bool) -> DisplayRow {
    DisplayRow {
        id: d.id.clone(),
        name: d.name.clone(),
        size: format!("{}x{}", d.width, d.height),
        brightness: format!("{}%", d.brightness),
        power: output::on_off(d.power, color),
        rotation: output::on_off(d.rotation_enabled, color),
        current_app: d.current_app.clone().unwrap_or_default(),
    }
}

fn detail(d: &Display, status: DisplayStatus, color: bool) -> String {
    [
        format!("ID:          {}", d.id),
        format!("Name:        {}", d.name),
        format!("Status:      {}", output::status_label(status, color)),
        format!("Size:        {}x{}", d.width, d.height),
        format!("Brightness:  {}%", d.brightness),
        format!("Power:       {}", output::on_off(d.power, color)),
        format!("Rotation:    {}", output::on_off(d.rotation_enabled, color)),
        format!("Current App: {}", d.current_app.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub(crate) fn render_displays(displays: &[Display], global: &GlobalOpts) -> String {
    let color = output::should_color(&global.color);
    output::render_list(
        &global.output,
        displays,
        |d| display_row(d, color),
        |d| d.id.clone(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    coordinator: &Coordinator,
    args: DisplaysArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DisplaysCommand::List => {
            coordinator.refresh().await?;
            let snap = coordinator.snapshot();
            let displays: Vec<Display> = snap.displays.values().cloned().collect();
            output::print_output(&render_displays(&displays, global), global.quiet);
            Ok(())
        }

        DisplaysCommand::Get { display } => {
            coordinator.refresh().await?;
            if coordinator.display_status(&display) == DisplayStatus::Disconnected {
                return Err(CliError::NotFound {
                    resource_type: "display".into(),
                    identifier: display,
                    list_command: "displays list".into(),
                });
            }
            let found = coordinator.get_display(&display);
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &found,
                |d| detail(d, DisplayStatus::Connected, color),
                |d| d.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DisplaysCommand::Register {
            id,
            name,
            width,
            height,
            client_type,
        } => {
            let mut request = RegisterDisplay::new(id.clone(), name.unwrap_or(id));
            request.width = width;
            request.height = height;
            request.client_type = client_type;

            let created = coordinator
                .client()
                .register_display(&request)
                .await
                .map_err(CoreError::from)?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &created,
                |d| detail(d, DisplayStatus::Connected, color),
                |d| d.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DisplaysCommand::Brightness { display, level } => {
            let ack = coordinator.set_brightness(&display, level).await?;
            output::print_ack(
                &global.output,
                &ack,
                &format!("Brightness of {display} set to {level}%"),
                global.quiet,
            );
            Ok(())
        }

        DisplaysCommand::Power { display, state } => {
            let ack = coordinator.set_power(&display, state.is_on()).await?;
            let label = if state.is_on() { "on" } else { "off" };
            output::print_ack(
                &global.output,
                &ack,
                &format!("Display {display} turned {label}"),
                global.quiet,
            );
            Ok(())
        }
    }
}
