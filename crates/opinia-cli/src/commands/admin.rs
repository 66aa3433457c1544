use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AdminArgs;
use crate::cli::subcommands::AdminCommands;
use crate::commands::shared::secret::read_secret;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct ArtifactResponse {
    name: String,
    content: String,
}

#[derive(Serialize)]
struct DeletedResponse {
    deleted: String,
}

/// Handle `opn admin`. The caller must pass the upstream login and be on
/// the admin list.
pub async fn handle(args: &AdminArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let password = read_secret(
        &mut std::io::stdin().lock(),
        (!args.password_stdin).then_some("password"),
    )?;
    let credential = ctx.admin_login()?.verify(&args.uid, &password).await?;
    tracing::info!(admin = %credential.subject, "administrator authenticated");

    let admin = ctx.survey.admin();
    match &args.action {
        AdminCommands::List { kind } => {
            let entries = admin.list(kind.map(Into::into))?;
            output(&entries, flags.format)
        }
        AdminCommands::Show { name } => {
            let content = admin.read(name)?;
            output(
                &ArtifactResponse {
                    name: name.clone(),
                    content,
                },
                flags.format,
            )
        }
        AdminCommands::Delete { name } => {
            admin.delete(name)?;
            output(
                &DeletedResponse {
                    deleted: name.clone(),
                },
                flags.format,
            )
        }
    }
}
