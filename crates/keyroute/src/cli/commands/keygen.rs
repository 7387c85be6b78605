//! # Keygen Command
//!
//! `keyroute keygen` resolves what a key pair request needs: the algorithm,
//! the fingerprint hash and the private key password.
//!
//! ## Output Format
//!
//! ```text
//! Key pair request
//!   Algorithm: ed25519
//!   Hash algorithm: sha256
//!   Password protected: yes
//!   Output: -
//! ```

use std::io::{self, Write};

use keyroute_core::{HashAlgorithm, KeyAlgorithm};
use keyroute_resolve::ArgumentIo;
use serde::Serialize;
use tracing::info;

use super::{display_path, yes_no, CommandError, Report};

/// The resolved key pair request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeygenReport {
    /// Key algorithm.
    pub algorithm: KeyAlgorithm,
    /// Hash algorithm for the key fingerprint.
    pub hash_algorithm: HashAlgorithm,
    /// Whether the private key is protected by a password.
    pub password_protected: bool,
    /// Private key destination, `-` for standard output.
    pub output: String,
}

impl Report for KeygenReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Key pair request")?;
        writeln!(out, "  Algorithm: {}", self.algorithm)?;
        writeln!(out, "  Hash algorithm: {}", self.hash_algorithm)?;
        writeln!(out, "  Password protected: {}", yes_no(self.password_protected))?;
        writeln!(out, "  Output: {}", self.output)
    }
}

/// The `keyroute keygen` command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeygenCommand;

impl KeygenCommand {
    /// Resolve the request.
    ///
    /// # Errors
    ///
    /// Returns an argument error if the algorithm is unknown, or if no
    /// password is given and `--no-password` is not set.
    pub fn run(self, io: &mut ArgumentIo) -> Result<KeygenReport, CommandError> {
        let algorithm = io.get_key_algorithm()?;
        let hash_algorithm = io.get_hash_algorithm()?;
        let output = io.get_output()?;
        let password = io.get_key_password()?;

        info!(%algorithm, %hash_algorithm, "Resolved key pair request");
        Ok(KeygenReport {
            algorithm,
            hash_algorithm,
            password_protected: !password.is_empty(),
            output: display_path(output.as_deref()),
        })
    }
}
