use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Survey(args) => commands::survey::handle(&args, ctx, flags).await,
        Commands::Identity(args) => commands::identity::handle(&args, ctx, flags),
        Commands::Catalog(args) => commands::catalog::handle(&args, ctx, flags),
        Commands::Admin(args) => commands::admin::handle(&args, ctx, flags).await,
        Commands::Pin { action } => commands::pin::handle(&action, ctx, flags).await,
    }
}
