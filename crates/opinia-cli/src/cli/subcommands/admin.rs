use clap::{Subcommand, ValueEnum};
use opinia_store::ArtifactKind;

/// Artifact administration commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AdminCommands {
    /// List stored artifacts.
    List {
        /// Only artifacts of this kind.
        #[arg(long)]
        kind: Option<ArtifactKindArg>,
    },
    /// Print one artifact.
    Show {
        /// Artifact name, e.g. `<identifier>.log`.
        name: String,
    },
    /// Delete one artifact.
    Delete {
        /// Artifact name, e.g. `<identifier>.profile`.
        name: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ArtifactKindArg {
    Profile,
    Log,
    Suggestions,
}

impl From<ArtifactKindArg> for ArtifactKind {
    fn from(value: ArtifactKindArg) -> Self {
        match value {
            ArtifactKindArg::Profile => Self::Profile,
            ArtifactKindArg::Log => Self::Log,
            ArtifactKindArg::Suggestions => Self::Suggestions,
        }
    }
}
