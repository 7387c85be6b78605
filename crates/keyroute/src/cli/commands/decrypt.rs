//! # Decrypt Command
//!
//! `keyroute decrypt <keypass>...` tries each credential in order and
//! reports the first one that opens the data.
//!
//! Credentials are resolved locally only (file, enumerated, text): the card
//! directory never holds private keys.
//!
//! ## Output Format
//!
//! ```text
//! Decryption request
//!   Input: secret.enc
//!   Output: -
//!   Credential: privkey:<hidden>:alice
//!   - private-key alice (sha256 2c26b4..., password: yes)
//! ```

use std::io::{self, Write};

use keyroute_core::error::{CryptoError, KeyrouteError};
use keyroute_resolve::{ArgumentIo, SourceKinds};
use serde::Serialize;
use tracing::{debug, info};

use super::describe::{DescribingCipher, RecipientEntry};
use super::encrypt::key_password_for;
use super::{display_path, CommandError, Report};

/// The resolved decryption request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecryptReport {
    /// Data source, `-` for standard input.
    pub input: String,
    /// Destination, `-` for standard output.
    pub output: String,
    /// Whether the content info is read from a separate file.
    pub detached_content_info: bool,
    /// The credential that worked, secrets masked.
    pub credential: String,
    /// What the credential contributed.
    pub entry: RecipientEntry,
}

impl Report for DecryptReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Decryption request")?;
        writeln!(out, "  Input: {}", self.input)?;
        writeln!(out, "  Output: {}", self.output)?;
        if self.detached_content_info {
            writeln!(out, "  Content info: detached")?;
        }
        writeln!(out, "  Credential: {}", self.credential)?;
        self.entry.write_text(out)
    }
}

/// The `keyroute decrypt` command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecryptCommand;

impl DecryptCommand {
    /// Try every credential in order; the first that works wins.
    ///
    /// Credentials the cipher rejects are skipped. A credential that cannot
    /// be resolved at all is a hard error.
    ///
    /// # Errors
    ///
    /// Returns an argument error for a missing or malformed credential, or
    /// [`CryptoError::Failed`] if no credential works.
    pub fn run(self, io: &mut ArgumentIo) -> Result<DecryptReport, CommandError> {
        let input = io.get_input()?;
        let output = io.get_output()?;
        let detached_content_info = io.has_content_info()?;
        let credentials = io.get_decrypt_recipients()?;
        let key_password = key_password_for(io, &credentials)?;

        for credential in &credentials {
            let mut cipher = DescribingCipher::new();
            match credential.decrypt_with(&mut cipher, io.resolver(), SourceKinds::LOCAL, &key_password) {
                Ok(()) => {
                    let entry = cipher
                        .into_entries()
                        .pop()
                        .ok_or_else(|| CryptoError::failed("Cipher reported no credential."))?;
                    info!(credential = %credential, "Decrypted");
                    return Ok(DecryptReport {
                        input: display_path(input.as_deref()),
                        output: display_path(output.as_deref()),
                        detached_content_info,
                        credential: credential.to_string(),
                        entry,
                    });
                }
                Err(KeyrouteError::Crypto(e)) => {
                    debug!(credential = %credential, error = %e, "Credential rejected");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CryptoError::failed("Can not decrypt with any of the given credentials.").into())
    }
}
