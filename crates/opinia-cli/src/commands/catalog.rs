use crate::cli::GlobalFlags;
use crate::cli::root_commands::CatalogArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `opn catalog`.
pub fn handle(args: &CatalogArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let items = ctx.catalog.load(args.year)?;
    output(&*items, flags.format)
}
