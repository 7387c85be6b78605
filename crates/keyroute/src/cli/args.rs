//! # CLI Argument Definitions
//!
//! The clap grammar of the `keyroute` binary.
//!
//! Every value argument is declared as a plain string with an explicit id.
//! The command-line source looks values up by these ids, so they match the
//! names commands ask the argument chain for (see
//! [`keyroute_resolve::io::names`]). Nothing here is required at the clap
//! level: a value may just as well come from `-D`, the config file, a
//! default or the prompt.
//!
//! ## Commands
//!
//! - `keyroute keygen` - Describe a key pair request
//! - `keyroute encrypt <recipient-id>...` - Resolve encryption recipients
//! - `keyroute decrypt <keypass>...` - Resolve decryption credentials
//! - `keyroute key info` - Describe a private key
//! - `keyroute card search|get|create|revoke` - Work with the local card directory
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level
//! - `-q, --quiet` - Errors only, never prompt
//! - `--interactive` - Prompt for missing required arguments
//! - `--interactive-optional` - Prompt for missing optional arguments too
//! - `-c, --config <PATH>` - Path to configuration file
//! - `-D, --define <KEY=VALUE>` - Override an argument
//! - `--format <text|json>` - Output format

use clap::{Parser, Subcommand};

/// Resolve keys, passwords and recipients for security commands.
#[derive(Debug, Parser)]
#[command(name = "keyroute")]
#[command(author, version, about = "Resolve keys, passwords and recipients")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    ///
    /// Can be specified multiple times to increase verbosity level:
    /// - `-v` - Show info messages and the usage after an error
    /// - `-vv` - Show debug messages
    /// - `-vvv` - Show trace messages
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors and never prompt
    #[arg(short, long, id = "quiet", global = true)]
    pub quiet: bool,

    /// Prompt for required arguments no other source provides
    #[arg(long, id = "interactive", global = true)]
    pub interactive: bool,

    /// Prompt for optional arguments too (implies --interactive)
    #[arg(long, id = "interactive-optional", global = true)]
    pub interactive_optional: bool,

    /// Path to config file
    ///
    /// Defaults to `~/.keyroute/config.toml`. An explicitly named file must
    /// exist.
    #[arg(short, long, id = "config", global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Override an argument, e.g. `-D algorithm=secp256r1`
    ///
    /// Overrides are consulted after the command line and before the config
    /// file. May be repeated.
    #[arg(short = 'D', long, id = "define", global = true, value_name = "KEY=VALUE")]
    pub define: Vec<String>,

    /// Output format
    #[arg(long, id = "format", global = true, value_parser = ["text", "json"])]
    pub format: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Describe a key pair request
    ///
    /// Resolves the key algorithm and the private key password.
    Keygen {
        /// Key algorithm (default: ed25519)
        #[arg(short, long, id = "algorithm")]
        algorithm: Option<String>,

        /// Hash algorithm for the key fingerprint (default: sha256)
        #[arg(long, id = "hash-algorithm")]
        hash_algorithm: Option<String>,

        /// Where the private key goes; standard output when absent
        #[arg(short, long, id = "out", value_name = "FILE")]
        out: Option<String>,

        /// Password protecting the private key
        #[arg(short = 'p', long, id = "private-key-password", value_name = "PASSWORD")]
        private_key_password: Option<String>,

        /// The private key has no password
        #[arg(long, id = "no-password")]
        no_password: bool,
    },

    /// Resolve encryption recipients
    ///
    /// Each recipient is `type:value[:alias]` where type is one of
    /// password, email, pubkey, privkey or vcard.
    Encrypt {
        /// Data to encrypt; standard input when absent
        #[arg(short, long = "in", id = "in", value_name = "FILE")]
        input: Option<String>,

        /// Where the encrypted data goes; standard output when absent
        #[arg(short, long, id = "out", value_name = "FILE")]
        out: Option<String>,

        /// Write the content info to a separate file
        #[arg(long, id = "content-info", value_name = "FILE")]
        content_info: Option<String>,

        /// Password for privkey recipients
        #[arg(short = 'p', long, id = "private-key-password", value_name = "PASSWORD")]
        private_key_password: Option<String>,

        /// Private key recipients have no password
        #[arg(long, id = "no-password")]
        no_password: bool,

        /// Recipients, e.g. `email:alice@example.com` or `pubkey:bob.pub:bob`
        #[arg(id = "recipient-id", value_name = "RECIPIENT")]
        recipient_id: Vec<String>,
    },

    /// Resolve decryption credentials
    ///
    /// Each credential is `password:<value>` or `privkey:<value>[:alias]`.
    /// They are tried in order and the first that works wins.
    Decrypt {
        /// Data to decrypt; standard input when absent
        #[arg(short, long = "in", id = "in", value_name = "FILE")]
        input: Option<String>,

        /// Where the decrypted data goes; standard output when absent
        #[arg(short, long, id = "out", value_name = "FILE")]
        out: Option<String>,

        /// Read the content info from a separate file
        #[arg(long, id = "content-info", value_name = "FILE")]
        content_info: Option<String>,

        /// Password for privkey credentials
        #[arg(short = 'p', long, id = "private-key-password", value_name = "PASSWORD")]
        private_key_password: Option<String>,

        /// Private key credentials have no password
        #[arg(long, id = "no-password")]
        no_password: bool,

        /// Credentials, e.g. `privkey:alice.key` or `password:hunter2`
        #[arg(id = "keypass", value_name = "KEYPASS")]
        keypass: Vec<String>,
    },

    /// Work with private keys
    #[command(subcommand)]
    Key(KeyCommands),

    /// Work with the local card directory
    #[command(subcommand)]
    Card(CardCommands),
}

/// Key subcommands.
#[derive(Debug, Subcommand)]
pub enum KeyCommands {
    /// Describe a private key without showing it
    Info {
        /// Private key: a file or base64 text
        #[arg(short, long, id = "key", value_name = "KEY")]
        key: Option<String>,

        /// Password protecting the private key
        #[arg(short = 'p', long, id = "private-key-password", value_name = "PASSWORD")]
        private_key_password: Option<String>,

        /// Where the public key goes; standard output when absent
        #[arg(short, long, id = "out", value_name = "FILE")]
        out: Option<String>,
    },
}

/// Card subcommands.
#[derive(Debug, Subcommand)]
pub enum CardCommands {
    /// Find cards for an identity
    Search {
        /// Identity as `type:value`, e.g. `email:alice@example.com`
        #[arg(id = "identity", value_name = "IDENTITY")]
        identity: Option<String>,

        /// Scope to search (default: application)
        #[arg(short, long, id = "scope", value_parser = ["global", "application"])]
        scope: Option<String>,
    },

    /// Show one card
    Get {
        /// The card id
        #[arg(id = "card-id", value_name = "CARD_ID")]
        card_id: Option<String>,
    },

    /// Publish a card binding an identity to a public key
    Create {
        /// Identity as `type:value`
        #[arg(short, long, id = "identity", value_name = "IDENTITY")]
        identity: Option<String>,

        /// Visibility scope (default: application)
        #[arg(short, long, id = "scope", value_parser = ["global", "application"])]
        scope: Option<String>,

        /// Public key: a file, base64 text or a `pubkey:` token
        #[arg(short = 'k', long, id = "public-key", value_name = "KEY")]
        public_key: Option<String>,

        /// Application token authorising the request
        #[arg(long, id = "application-token", value_name = "TOKEN")]
        application_token: Option<String>,
    },

    /// Revoke a card
    Revoke {
        /// The card id
        #[arg(id = "card-id", value_name = "CARD_ID")]
        card_id: Option<String>,

        /// Why the card is revoked (default: unspecified)
        #[arg(short, long, id = "reason", value_parser = ["unspecified", "compromised"])]
        reason: Option<String>,

        /// Application token authorising the request
        #[arg(long, id = "application-token", value_name = "TOKEN")]
        application_token: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::indexing_slicing
    )]

    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "keyroute", "encrypt", "-vv", "--quiet", "--format", "json", "password:x",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
        assert_eq!(cli.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["keyroute", "keygen", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_recipients_are_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["keyroute", "encrypt"]).unwrap();
        match cli.command {
            Commands::Encrypt { recipient_id, .. } => assert!(recipient_id.is_empty()),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
