//! A [`Cipher`] that records what each recipient contributes.
//!
//! Keys are shown as SHA-256 fingerprints. Passwords are never shown, only
//! that one was given. When a recipient has no alias the identifier is the
//! first 16 hex digits of the key fingerprint.

use std::io::{self, Write};

use keyroute_core::error::{CryptoError, CryptoResult};
use keyroute_core::{Password, PrivateKey, PublicKey};
use keyroute_resolve::Cipher;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex digits of the fingerprint used as a derived identifier.
const DERIVED_IDENTIFIER_LEN: usize = 16;

/// What a recorded entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipientKind {
    /// A public key.
    Key,
    /// A private key, used for its public half or to decrypt.
    PrivateKey,
    /// A password.
    Password,
}

impl RecipientKind {
    /// Returns the kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::PrivateKey => "private-key",
            Self::Password => "password",
        }
    }
}

/// One recipient as the cipher saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientEntry {
    /// Entry kind.
    pub kind: RecipientKind,
    /// Recipient identifier, empty for passwords.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub identifier: String,
    /// Hex SHA-256 of the key bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Whether a private key came with a password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_protected: Option<bool>,
}

impl RecipientEntry {
    fn key(identifier: Option<&[u8]>, bytes: &[u8]) -> Self {
        let fingerprint = fingerprint(bytes);
        Self {
            kind: RecipientKind::Key,
            identifier: identifier_or_derived(identifier, &fingerprint),
            fingerprint: Some(fingerprint),
            password_protected: None,
        }
    }

    fn private_key(identifier: Option<&[u8]>, key: &PrivateKey, password: &Password) -> Self {
        Self {
            kind: RecipientKind::PrivateKey,
            password_protected: Some(!password.is_empty() || !key.password().is_empty()),
            ..Self::key(identifier, key.as_bytes())
        }
    }

    const fn password() -> Self {
        Self {
            kind: RecipientKind::Password,
            identifier: String::new(),
            fingerprint: None,
            password_protected: None,
        }
    }

    /// Write the entry as one indented text line.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `out` fails.
    pub fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        match (&self.fingerprint, self.password_protected) {
            (Some(fingerprint), Some(protected)) => writeln!(
                out,
                "  - {} {} (sha256 {fingerprint}, password: {})",
                self.kind.as_str(),
                self.identifier,
                super::yes_no(protected)
            ),
            (Some(fingerprint), None) => writeln!(
                out,
                "  - {} {} (sha256 {fingerprint})",
                self.kind.as_str(),
                self.identifier
            ),
            _ => writeln!(out, "  - {}", self.kind.as_str()),
        }
    }
}

/// Hex SHA-256 of `bytes`.
#[must_use]
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn identifier_or_derived(identifier: Option<&[u8]>, fingerprint: &str) -> String {
    match identifier {
        Some(identifier) => String::from_utf8_lossy(identifier).into_owned(),
        None => fingerprint.chars().take(DERIVED_IDENTIFIER_LEN).collect(),
    }
}

/// Records recipients instead of encrypting.
#[derive(Debug, Default)]
pub struct DescribingCipher {
    entries: Vec<RecipientEntry>,
}

impl DescribingCipher {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in the order they were added.
    #[must_use]
    pub fn entries(&self) -> &[RecipientEntry] {
        &self.entries
    }

    /// Take the recorded entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<RecipientEntry> {
        self.entries
    }

    fn require_key(bytes: &[u8]) -> CryptoResult<()> {
        if bytes.is_empty() {
            return Err(CryptoError::failed("Key material is empty."));
        }
        Ok(())
    }
}

impl Cipher for DescribingCipher {
    fn add_key_recipient(&mut self, identifier: Option<&[u8]>, key: &PublicKey) -> CryptoResult<()> {
        Self::require_key(key.as_bytes())?;
        self.entries.push(RecipientEntry::key(identifier, key.as_bytes()));
        Ok(())
    }

    fn add_private_key_recipient(
        &mut self,
        identifier: Option<&[u8]>,
        key: &PrivateKey,
        password: &Password,
    ) -> CryptoResult<()> {
        Self::require_key(key.as_bytes())?;
        self.entries
            .push(RecipientEntry::private_key(identifier, key, password));
        Ok(())
    }

    fn add_password_recipient(&mut self, password: &Password) -> CryptoResult<()> {
        if password.is_empty() {
            return Err(CryptoError::failed("Password is empty."));
        }
        self.entries.push(RecipientEntry::password());
        Ok(())
    }

    fn decrypt_with_key(
        &mut self,
        identifier: Option<&[u8]>,
        key: &PrivateKey,
        password: &Password,
    ) -> CryptoResult<()> {
        self.add_private_key_recipient(identifier, key, password)
    }

    fn decrypt_with_password(&mut self, password: &Password) -> CryptoResult<()> {
        self.add_password_recipient(password)
    }
}
