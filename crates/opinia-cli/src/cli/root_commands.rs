use clap::{ArgGroup, Args, Subcommand};

use crate::cli::subcommands::{AdminCommands, PinCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Authenticate and answer comparison rounds on stdin.
    Survey(SurveyArgs),
    /// Print the anonymous identifier for a credential.
    Identity(IdentityArgs),
    /// Print the course catalog for a curriculum year.
    Catalog(CatalogArgs),
    /// Browse and delete stored artifacts (administrators only).
    Admin(AdminArgs),
    /// Email PIN issue and check.
    Pin {
        #[command(subcommand)]
        action: PinCommands,
    },
}

/// Arguments for `opn survey`.
#[derive(Clone, Debug, Args)]
#[command(group(ArgGroup::new("respondent").required(true).args(["uid", "email"])))]
pub struct SurveyArgs {
    /// Student ID (password scheme).
    #[arg(long)]
    pub uid: Option<String>,
    /// Email address (email PIN scheme).
    #[arg(long)]
    pub email: Option<String>,
    /// Curriculum year; required on a first visit, ignored afterwards.
    #[arg(long)]
    pub year: Option<u16>,
    /// Read the password from the first stdin line without prompting.
    #[arg(long)]
    pub password_stdin: bool,
    /// PIN already received by mail; skips sending a new one.
    #[arg(long, requires = "email")]
    pub pin: Option<String>,
}

/// Arguments for `opn identity`.
#[derive(Clone, Debug, Args)]
pub struct IdentityArgs {
    /// Student ID or email address.
    pub credential: String,
}

/// Arguments for `opn catalog`.
#[derive(Clone, Debug, Args)]
pub struct CatalogArgs {
    /// Curriculum year (2019-2022).
    pub year: u16,
}

/// Arguments for `opn admin`.
#[derive(Clone, Debug, Args)]
pub struct AdminArgs {
    /// Administrator student ID.
    #[arg(long)]
    pub uid: String,
    /// Read the password from the first stdin line without prompting.
    #[arg(long)]
    pub password_stdin: bool,
    #[command(subcommand)]
    pub action: AdminCommands,
}
