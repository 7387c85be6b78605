//! Domain types produced by argument resolution.
//!
//! Secret material ([`Password`], [`PrivateKey`]) is:
//! - Zeroized on drop
//! - Never exposed in debug output
//! - Compared in constant time
//!
//! Neither secret type implements `Clone`; values are moved from the
//! resolver that produced them into the operation that consumes them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ArgumentError;

// ============================================================================
// Password
// ============================================================================

/// A password or passphrase.
///
/// An empty password is valid and means "no password" (for example when
/// `--no-password` was given).
///
/// # Example
///
/// ```
/// use keyroute_core::types::Password;
///
/// let password = Password::new("correct horse");
/// assert_eq!(format!("{password:?}"), "Password([REDACTED])");
/// assert!(Password::empty().is_empty());
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Password {
    bytes: Vec<u8>,
}

impl Password {
    /// Create a password from raw bytes or a string.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Create an empty password.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Returns the password bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns `true` if the password is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Copy the password into a new value.
    ///
    /// Explicit so every duplication of secret material is visible at the
    /// call site.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self::new(self.bytes.clone())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for Password {}

// ============================================================================
// PrivateKey
// ============================================================================

/// Private key material together with the password that protects it.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: Vec<u8>,
    alias: String,
    password: Password,
}

impl PrivateKey {
    /// Create a private key with an optional alias and no password.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>, alias: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            alias: alias.into(),
            password: Password::empty(),
        }
    }

    /// Attach the password protecting this key.
    #[must_use]
    pub fn with_password(mut self, password: Password) -> Self {
        self.password = password;
        self
    }

    /// Returns the encoded key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the alias, empty when none was given.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the key password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bytes", &"[REDACTED]")
            .field("alias", &self.alias)
            .field("has_password", &!self.password.is_empty())
            .finish()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.bytes.ct_eq(&other.bytes))
            && self.alias == other.alias
            && self.password == other.password
    }
}

impl Eq for PrivateKey {}

// ============================================================================
// PublicKey
// ============================================================================

/// Public key material with an optional alias.
///
/// The alias, when set, is used as the recipient identifier.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    bytes: Vec<u8>,
    alias: String,
}

impl PublicKey {
    /// Create a public key.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>, alias: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            alias: alias.into(),
        }
    }

    /// Returns the encoded key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the alias, empty when none was given.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("len", &self.bytes.len())
            .field("alias", &self.alias)
            .finish()
    }
}

// ============================================================================
// KeyAlgorithm
// ============================================================================

/// Key pair algorithms accepted by `--algorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    /// Brainpool P-256.
    Bp256r1,
    /// Brainpool P-384.
    Bp384r1,
    /// Brainpool P-512.
    Bp512r1,
    /// Ed25519.
    Ed25519,
    /// RSA 3072 bit.
    Rsa3072,
    /// RSA 4096 bit.
    Rsa4096,
    /// RSA 8192 bit.
    Rsa8192,
    /// Koblitz 192 bit.
    Secp192k1,
    /// NIST P-192.
    Secp192r1,
    /// Koblitz 224 bit.
    Secp224k1,
    /// NIST P-224.
    Secp224r1,
    /// Koblitz 256 bit.
    Secp256k1,
    /// NIST P-256.
    Secp256r1,
    /// NIST P-384.
    Secp384r1,
    /// NIST P-521.
    Secp521r1,
}

impl KeyAlgorithm {
    /// Every supported algorithm, in name order.
    pub const ALL: [Self; 15] = [
        Self::Bp256r1,
        Self::Bp384r1,
        Self::Bp512r1,
        Self::Ed25519,
        Self::Rsa3072,
        Self::Rsa4096,
        Self::Rsa8192,
        Self::Secp192k1,
        Self::Secp192r1,
        Self::Secp224k1,
        Self::Secp224r1,
        Self::Secp256k1,
        Self::Secp256r1,
        Self::Secp384r1,
        Self::Secp521r1,
    ];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bp256r1 => "bp256r1",
            Self::Bp384r1 => "bp384r1",
            Self::Bp512r1 => "bp512r1",
            Self::Ed25519 => "ed25519",
            Self::Rsa3072 => "rsa3072",
            Self::Rsa4096 => "rsa4096",
            Self::Rsa8192 => "rsa8192",
            Self::Secp192k1 => "secp192k1",
            Self::Secp192r1 => "secp192r1",
            Self::Secp224k1 => "secp224k1",
            Self::Secp224r1 => "secp224r1",
            Self::Secp256k1 => "secp256k1",
            Self::Secp256r1 => "secp256r1",
            Self::Secp384r1 => "secp384r1",
            Self::Secp521r1 => "secp521r1",
        }
    }

    /// Look up an algorithm by name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str().eq_ignore_ascii_case(name))
    }

    /// Names of every supported algorithm.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.as_str()).collect()
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ArgumentError::value("--algorithm", s))
    }
}

// ============================================================================
// HashAlgorithm
// ============================================================================

/// Hash algorithms accepted by `--hash-algorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-1.
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [Self; 5] = [
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Look up an algorithm by name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str().eq_ignore_ascii_case(name))
    }

    /// Names of every supported algorithm.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.as_str()).collect()
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ArgumentError::value("--hash-algorithm", s))
    }
}
