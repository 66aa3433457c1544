use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PinCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct PinSentResponse {
    sent_to: String,
}

#[derive(Serialize)]
struct PinVerifiedResponse {
    verified: bool,
    identifier: String,
}

/// Handle `opn pin`.
pub async fn handle(action: &PinCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let login = ctx.pin_login()?;
    match action {
        PinCommands::Send { email } => {
            let sent_to = login.send(email).await?;
            output(&PinSentResponse { sent_to }, flags.format)
        }
        PinCommands::Verify { email, pin } => {
            let credential = login.verify(email, pin)?;
            let identifier = ctx.resolver()?.resolve(&credential.subject)?;
            output(
                &PinVerifiedResponse {
                    verified: true,
                    identifier,
                },
                flags.format,
            )
        }
    }
}
