//! Notification command handlers.

use mosaic_core::{
    ClearRequest, Command as CoreCommand, Coordinator, PushImageRequest, PushTextRequest,
};

use crate::cli::{GlobalOpts, NotifyArgs, NotifyCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    coordinator: &Coordinator,
    args: NotifyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (command, message) = match args.command {
        NotifyCommand::Text {
            text,
            common,
            color,
            font,
        } => {
            let message = format!("Text pushed to {}", common.target);
            let request = PushTextRequest {
                target: common.target,
                text,
                duration: common.duration,
                priority: common.priority,
                color,
                font,
            };
            (CoreCommand::PushText(request), message)
        }

        NotifyCommand::Image { image, common } => {
            let message = format!("Image pushed to {}", common.target);
            let request = PushImageRequest {
                target: common.target,
                image,
                duration: common.duration,
                priority: common.priority,
            };
            (CoreCommand::PushImage(request), message)
        }

        NotifyCommand::Clear { target } => {
            let message = format!("Notifications cleared on {target}");
            (CoreCommand::Clear(ClearRequest { target }), message)
        }
    };

    let ack = coordinator.execute(command).await?;
    output::print_ack(&global.output, &ack, &message, global.quiet);
    Ok(())
}
