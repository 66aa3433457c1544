use serde::Serialize;

use opinia_auth::normalize_address;
use opinia_config::AuthMethod;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::IdentityArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct IdentityResponse {
    identifier: String,
}

/// Handle `opn identity`.
pub fn handle(args: &IdentityArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let resolver = ctx.resolver()?;
    // Email credentials are resolved in their normalized form, as at login.
    let credential = match ctx.config.auth.method {
        AuthMethod::EmailPin => normalize_address(&args.credential)?,
        AuthMethod::Password => args.credential.clone(),
    };
    let identifier = resolver.resolve(&credential)?;
    output(&IdentityResponse { identifier }, flags.format)
}
