//! # Encrypt Command
//!
//! `keyroute encrypt <recipient-id>...` resolves every recipient and reports
//! what each contributes to the encryption.
//!
//! Recipients may come from any source, so `email:` recipients are looked
//! up in the card directory too.
//!
//! ## Output Format
//!
//! ```text
//! Encryption request
//!   Input: plain.txt
//!   Output: -
//!   Content info: embedded
//!   Recipients:
//!   - key alice@example.com (sha256 9f86d0...)
//!   - password
//! ```

use std::io::{self, Write};

use keyroute_core::Password;
use keyroute_resolve::{ArgumentIo, KeyRecipient, Recipient, SourceKinds};
use serde::Serialize;
use tracing::info;

use super::describe::{DescribingCipher, RecipientEntry};
use super::{display_path, CommandError, Report};

/// The resolved encryption request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptReport {
    /// Data source, `-` for standard input.
    pub input: String,
    /// Destination, `-` for standard output.
    pub output: String,
    /// Whether the content info goes to a separate file.
    pub detached_content_info: bool,
    /// One entry per key or password added.
    pub recipients: Vec<RecipientEntry>,
}

impl Report for EncryptReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Encryption request")?;
        writeln!(out, "  Input: {}", self.input)?;
        writeln!(out, "  Output: {}", self.output)?;
        writeln!(
            out,
            "  Content info: {}",
            if self.detached_content_info {
                "detached"
            } else {
                "embedded"
            }
        )?;
        writeln!(out, "  Recipients:")?;
        for entry in &self.recipients {
            entry.write_text(out)?;
        }
        Ok(())
    }
}

/// Whether any recipient needs the private key password.
pub(crate) fn needs_key_password(recipients: &[Recipient]) -> bool {
    recipients
        .iter()
        .any(|recipient| matches!(recipient, Recipient::Key(KeyRecipient::PrivateKey(_))))
}

/// The key password when a private key recipient needs it, empty otherwise.
pub(crate) fn key_password_for(
    io: &mut ArgumentIo,
    recipients: &[Recipient],
) -> Result<Password, CommandError> {
    if needs_key_password(recipients) {
        Ok(io.get_key_password()?)
    } else {
        Ok(Password::empty())
    }
}

/// The `keyroute encrypt` command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncryptCommand;

impl EncryptCommand {
    /// Resolve every recipient.
    ///
    /// # Errors
    ///
    /// Returns an argument error for a missing input file, a malformed or
    /// unknown recipient, or a recipient that cannot be resolved.
    pub fn run(self, io: &mut ArgumentIo) -> Result<EncryptReport, CommandError> {
        let input = io.get_input()?;
        let output = io.get_output()?;
        let detached_content_info = io.has_content_info()?;
        let recipients = io.get_encrypt_recipients()?;
        let key_password = key_password_for(io, &recipients)?;

        let mut cipher = DescribingCipher::new();
        for recipient in &recipients {
            recipient.add_to(&mut cipher, io.resolver(), SourceKinds::ALL, &key_password)?;
        }
        info!(
            recipients = recipients.len(),
            keys = cipher.entries().len(),
            "Resolved encryption recipients"
        );

        Ok(EncryptReport {
            input: display_path(input.as_deref()),
            output: display_path(output.as_deref()),
            detached_content_info,
            recipients: cipher.into_entries(),
        })
    }
}
