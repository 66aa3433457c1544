use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `opn` binary.
#[derive(Debug, Parser)]
#[command(name = "opn", version, about = "Opinia - pairwise course comparison survey")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Artifact directory (overrides storage.data_dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            data_dir: self.data_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::subcommands::{AdminCommands, PinCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["opn", "--format", "raw", "--verbose", "catalog", "2020"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Catalog(ref args) if args.year == 2020));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["opn", "identity", "2000012345", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Identity(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["opn", "--format", "table", "catalog", "2020"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn survey_needs_uid_or_email_not_both() {
        assert!(Cli::try_parse_from(["opn", "survey"]).is_err());
        assert!(
            Cli::try_parse_from(["opn", "survey", "--uid", "1", "--email", "a@b.c"]).is_err()
        );
        let cli = Cli::try_parse_from(["opn", "survey", "--uid", "1", "--year", "2021"])
            .expect("cli should parse");
        let Commands::Survey(args) = cli.command else {
            panic!("expected survey");
        };
        assert_eq!(args.uid.as_deref(), Some("1"));
        assert_eq!(args.year, Some(2021));
        assert!(!args.password_stdin);
    }

    #[test]
    fn admin_kind_filter_parses() {
        let cli = Cli::try_parse_from(["opn", "admin", "--uid", "9", "list", "--kind", "log"])
            .expect("cli should parse");
        let Commands::Admin(args) = cli.command else {
            panic!("expected admin");
        };
        assert_eq!(args.uid, "9");
        assert!(matches!(args.action, AdminCommands::List { kind: Some(_) }));
    }

    #[test]
    fn pin_verify_takes_email_and_pin() {
        let cli = Cli::try_parse_from(["opn", "pin", "verify", "a@b.c", "012345"])
            .expect("cli should parse");
        let Commands::Pin { action } = cli.command else {
            panic!("expected pin");
        };
        assert!(matches!(action, PinCommands::Verify { ref pin, .. } if pin == "012345"));
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["opn", "--data-dir", "/tmp/opinia", "catalog", "2019"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(
            flags.data_dir.as_deref(),
            Some(std::path::Path::new("/tmp/opinia"))
        );
    }
}
