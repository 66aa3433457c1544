use clap::Subcommand;

/// Email PIN commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PinCommands {
    /// Mail the verification PIN for an address.
    Send {
        /// Recipient address.
        email: String,
    },
    /// Check a PIN and print the resulting identifier.
    Verify {
        /// Address the PIN was sent to.
        email: String,
        /// Six-digit PIN.
        pin: String,
    },
}
