//! # CLI Command Handlers
//!
//! Every command resolves its inputs through an [`ArgumentIo`] and reports
//! the resolved request in text or JSON. Commands never look at argv.
//!
//! ## Module Structure
//!
//! - [`keygen`] - Key pair request
//! - [`encrypt`] - Encryption recipients
//! - [`decrypt`] - Decryption credentials
//! - [`key`] - Private key lookup
//! - [`card`] - Card directory search, get, create and revoke
//! - [`describe`] - The cipher that records what recipients contribute
//! - [`exit_codes`] - Process exit codes
//!
//! ## Error Handling
//!
//! Handlers return `Result<_, CommandError>`. The caller prints a single
//! `Error: ...` line and maps the failure to an exit code.

pub mod card;
pub mod decrypt;
pub mod describe;
pub mod encrypt;
pub mod exit_codes;
pub mod key;
pub mod keygen;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use keyroute_core::error::{ArgumentError, CryptoError, DirectoryError, KeyrouteError};
use keyroute_resolve::{ArgumentIo, DirectoryService};
use serde::Serialize;

pub use card::{CardCreateCommand, CardGetCommand, CardRevokeCommand, CardSearchCommand};
pub use decrypt::DecryptCommand;
pub use describe::{DescribingCipher, RecipientEntry, RecipientKind};
pub use encrypt::EncryptCommand;
pub use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
pub use key::KeyInfoCommand;
pub use keygen::KeygenCommand;

/// Argument name of the output format.
pub const FORMAT: &str = "format";

// ============================================================================
// CommandError
// ============================================================================

/// Errors a command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Argument resolution, directory or cipher failure.
    #[error(transparent)]
    Keyroute(#[from] KeyrouteError),

    /// The report could not be serialized.
    #[error("Failed to format output: {0}")]
    Output(#[from] serde_json::Error),

    /// The report could not be written.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    /// The command path names no command.
    #[error("Unknown command '{0}'.")]
    UnknownCommand(String),
}

impl From<ArgumentError> for CommandError {
    fn from(err: ArgumentError) -> Self {
        Self::Keyroute(err.into())
    }
}

impl From<DirectoryError> for CommandError {
    fn from(err: DirectoryError) -> Self {
        Self::Keyroute(err.into())
    }
}

impl From<CryptoError> for CommandError {
    fn from(err: CryptoError) -> Self {
        Self::Keyroute(err.into())
    }
}

// ============================================================================
// Output
// ============================================================================

/// Output format for command reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ArgumentError::value(FORMAT, other)),
        }
    }
}

/// A command result that can be shown as text or JSON.
pub trait Report: Serialize {
    /// Write the human-readable form.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `out` fails.
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Write `report` to `out` in `format`.
///
/// # Errors
///
/// Returns [`CommandError::Output`] if JSON serialization fails, or
/// [`CommandError::Io`] if writing fails.
pub fn emit(report: &impl Report, format: OutputFormat, out: &mut dyn Write) -> Result<(), CommandError> {
    match format {
        OutputFormat::Text => report.write_text(out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Path shown for standard input or output.
pub(crate) fn display_path(path: Option<&std::path::Path>) -> String {
    path.map_or_else(|| "-".to_string(), |path| path.display().to_string())
}

pub(crate) const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run the command named by `command` (e.g. `card create`) and write its
/// report.
///
/// # Errors
///
/// Returns [`CommandError::UnknownCommand`] for an unknown path, or the
/// command's own error.
pub fn dispatch(
    command: &str,
    io: &mut ArgumentIo,
    directory: &Arc<dyn DirectoryService>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    tracing::debug!(command, %format, "Dispatch command");
    match command {
        "keygen" => emit(&KeygenCommand.run(io)?, format, out),
        "encrypt" => emit(&EncryptCommand.run(io)?, format, out),
        "decrypt" => emit(&DecryptCommand.run(io)?, format, out),
        "key info" => emit(&KeyInfoCommand.run(io)?, format, out),
        "card search" => emit(
            &CardSearchCommand::new(Arc::clone(directory)).run(io)?,
            format,
            out,
        ),
        "card get" => emit(
            &CardGetCommand::new(Arc::clone(directory)).run(io)?,
            format,
            out,
        ),
        "card create" => emit(
            &CardCreateCommand::new(Arc::clone(directory)).run(io)?,
            format,
            out,
        ),
        "card revoke" => emit(
            &CardRevokeCommand::new(Arc::clone(directory)).run(io)?,
            format,
            out,
        ),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
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
    use keyroute_args::source::OverrideSource;
    use keyroute_args::ArgumentSourceChain;
    use keyroute_resolve::{default_chain, MockDirectory};

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
    }

    impl Report for Sample {
        fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
            writeln!(out, "Name: {}", self.name)
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.to_string(), "Argument 'format' has unexpected value: 'xml'.");
    }

    #[test]
    fn test_emit_text_and_json() {
        let mut text = Vec::new();
        emit(&Sample { name: "alice" }, OutputFormat::Text, &mut text).unwrap();
        assert_eq!(String::from_utf8(text).unwrap(), "Name: alice\n");

        let mut json = Vec::new();
        emit(&Sample { name: "alice" }, OutputFormat::Json, &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["name"], "alice");
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let mut sources = ArgumentSourceChain::new().with(OverrideSource::new(Vec::new()));
        sources.init().unwrap();
        let directory: Arc<dyn DirectoryService> = Arc::new(MockDirectory::new());
        let mut io = ArgumentIo::new(sources, default_chain(Arc::clone(&directory)));

        let err = dispatch("card print", &mut io, &directory, OutputFormat::Text, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown command 'card print'.");
    }

    #[test]
    fn test_command_error_is_transparent_for_arguments() {
        let err: CommandError = ArgumentError::not_found("keypass").into();
        assert_eq!(err.to_string(), "Argument 'keypass' is not defined.");
    }
}
