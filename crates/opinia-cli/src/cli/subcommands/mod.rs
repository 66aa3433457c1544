mod admin;
mod pin;

pub use admin::{AdminCommands, ArtifactKindArg};
pub use pin::PinCommands;
