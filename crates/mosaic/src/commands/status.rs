//! `mosaic status`: service status plus a per-display summary.

use serde::Serialize;

use mosaic_core::{Coordinator, CoreError, DisplayStatus, ServerStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct StatusReport {
    url: String,
    server: ServerStatus,
    displays: Vec<DisplaySummary>,
}

#[derive(Serialize)]
struct DisplaySummary {
    id: String,
    status: DisplayStatus,
}

fn detail(report: &StatusReport, color: bool) -> String {
    let mut lines = vec![
        format!("URL:      {}", report.url),
        format!(
            "Status:   {}",
            report.server.status.as_deref().unwrap_or("-")
        ),
        format!(
            "Version:  {}",
            report.server.version.as_deref().unwrap_or("-")
        ),
        format!("Displays: {}", report.displays.len()),
    ];
    for d in &report.displays {
        lines.push(format!("  {:<16} {}", d.id, output::status_label(d.status, color)));
    }
    lines.join("\n")
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let server = coordinator
        .client()
        .get_status()
        .await
        .map_err(CoreError::from)?;
    coordinator.refresh().await?;

    let report = StatusReport {
        url: coordinator.client().base_url().to_string(),
        server,
        displays: coordinator
            .get_display_ids()
            .into_iter()
            .map(|id| DisplaySummary {
                status: coordinator.display_status(&id),
                id,
            })
            .collect(),
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| detail(r, color),
        |r| r.server.status.clone().unwrap_or_default(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
