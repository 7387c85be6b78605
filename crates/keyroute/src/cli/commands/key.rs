//! # Key Commands
//!
//! `keyroute key info` resolves a private key and the password protecting
//! it, and reports what was found without showing either.
//!
//! ## Output Format
//!
//! ```text
//! Private key
//!   Fingerprint: sha256 9f86d081...
//!   Size: 32 bytes
//!   Password given: yes
//!   Output: -
//! ```

use std::io::{self, Write};

use keyroute_resolve::ArgumentIo;
use serde::Serialize;
use tracing::info;

use super::describe::fingerprint;
use super::{display_path, yes_no, CommandError, Report};

/// The resolved private key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInfoReport {
    /// Hex SHA-256 of the key bytes.
    pub fingerprint: String,
    /// Key length in bytes.
    pub size: usize,
    /// Whether a password came with the key.
    pub password_given: bool,
    /// Where the public key goes, `-` for standard output.
    pub output: String,
}

impl Report for KeyInfoReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Private key")?;
        writeln!(out, "  Fingerprint: sha256 {}", self.fingerprint)?;
        writeln!(out, "  Size: {} bytes", self.size)?;
        writeln!(out, "  Password given: {}", yes_no(self.password_given))?;
        writeln!(out, "  Output: {}", self.output)
    }
}

/// The `keyroute key info` command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyInfoCommand;

impl KeyInfoCommand {
    /// Resolve the key.
    ///
    /// The key comes from a file or base64 text, never from the card
    /// directory. The password is optional.
    ///
    /// # Errors
    ///
    /// Returns [`keyroute_core::ArgumentError::NotFound`] if no key is
    /// given, or [`keyroute_core::ArgumentError::ValueSourceExhausted`] if
    /// the value is neither a file nor base64.
    pub fn run(self, io: &mut ArgumentIo) -> Result<KeyInfoReport, CommandError> {
        let key = io
            .get_private_key()?
            .with_password(io.get_key_password_optional()?);
        let output = io.get_output()?;

        let report = KeyInfoReport {
            fingerprint: fingerprint(key.as_bytes()),
            size: key.as_bytes().len(),
            password_given: !key.password().is_empty(),
            output: display_path(output.as_deref()),
        };
        info!(fingerprint = %report.fingerprint, "Resolved private key");
        Ok(report)
    }
}
