//! The value resolver trait and resolver kinds.
//!
//! A resolver turns a textual argument (a path, a directory identity, an
//! algorithm name, inline text) into a domain value. Each `try_*` method
//! either declines with `Ok(None)`, accepts with `Ok(Some(value))`, or fails
//! with an error when it accepted the input but could not use it. Every
//! method declines by default, so a resolver only implements the kinds it
//! understands.

use std::fmt;
use std::ops::BitOr;

use keyroute_args::ArgumentToken;
use keyroute_core::error::ArgumentResult;
use keyroute_core::{Card, HashAlgorithm, KeyAlgorithm, Password, PrivateKey, PublicKey};

/// The category of a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Files on disk.
    File,
    /// The card directory.
    Directory,
    /// Fixed names and inline key material.
    Enumerated,
    /// The literal text.
    Text,
}

impl SourceKind {
    const fn bit(self) -> u8 {
        match self {
            Self::File => 1,
            Self::Directory => 1 << 1,
            Self::Enumerated => 1 << 2,
            Self::Text => 1 << 3,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Enumerated => "enumerated",
            Self::Text => "text",
        })
    }
}

/// A set of [`SourceKind`]s selecting which resolvers a read may use.
///
/// # Examples
///
/// ```
/// use keyroute_resolve::{SourceKind, SourceKinds};
///
/// assert!(SourceKinds::ALL.contains(SourceKind::Directory));
/// assert!(!SourceKinds::LOCAL.contains(SourceKind::Directory));
/// assert_eq!(SourceKinds::FILE | SourceKinds::TEXT, SourceKinds::from_kinds(&[SourceKind::File, SourceKind::Text]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceKinds(u8);

impl SourceKinds {
    /// No resolver.
    pub const NONE: Self = Self(0);
    /// Files only.
    pub const FILE: Self = Self(SourceKind::File.bit());
    /// The directory only.
    pub const DIRECTORY: Self = Self(SourceKind::Directory.bit());
    /// Names and inline key material only.
    pub const ENUMERATED: Self = Self(SourceKind::Enumerated.bit());
    /// Literal text only.
    pub const TEXT: Self = Self(SourceKind::Text.bit());
    /// Every resolver.
    pub const ALL: Self = Self(
        SourceKind::File.bit()
            | SourceKind::Directory.bit()
            | SourceKind::Enumerated.bit()
            | SourceKind::Text.bit(),
    );
    /// Every resolver except the directory.
    pub const LOCAL: Self =
        Self(SourceKind::File.bit() | SourceKind::Enumerated.bit() | SourceKind::Text.bit());

    /// The set holding exactly `kinds`.
    #[must_use]
    pub fn from_kinds(kinds: &[SourceKind]) -> Self {
        Self(kinds.iter().fold(0, |bits, kind| bits | kind.bit()))
    }

    /// Returns `true` if `kind` is in the set.
    #[must_use]
    pub const fn contains(self, kind: SourceKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

impl BitOr for SourceKinds {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<SourceKind> for SourceKinds {
    fn from(kind: SourceKind) -> Self {
        Self(kind.bit())
    }
}

/// Turns argument text into domain values.
pub trait ValueResolver {
    /// Resolver name for logs.
    fn name(&self) -> &str;

    /// The category used to include or skip this resolver.
    fn kind(&self) -> SourceKind;

    /// Resolve a key algorithm name.
    ///
    /// # Errors
    ///
    /// Returns an error if the input was accepted but is unusable.
    fn try_key_algorithm(&self, _value: &str) -> ArgumentResult<Option<KeyAlgorithm>> {
        Ok(None)
    }

    /// Resolve a hash algorithm name.
    ///
    /// # Errors
    ///
    /// Returns an error if the input was accepted but is unusable.
    fn try_hash_algorithm(&self, _value: &str) -> ArgumentResult<Option<HashAlgorithm>> {
        Ok(None)
    }

    /// Resolve the public key a token refers to.
    ///
    /// # Errors
    ///
    /// Returns an error if the input was accepted but is unusable.
    fn try_public_key(&self, _token: &ArgumentToken) -> ArgumentResult<Option<PublicKey>> {
        Ok(None)
    }

    /// Resolve the private key a token refers to.
    ///
    /// # Errors
    ///
    /// Returns an error if the input was accepted but is unusable.
    fn try_private_key(&self, _token: &ArgumentToken) -> ArgumentResult<Option<PrivateKey>> {
        Ok(None)
    }

    /// Resolve a private key from a bare value, e.g. a `--key` path.
    ///
    /// # Errors
    ///
    /// Returns an error if the input was accepted but is unusable.
    fn try_private_key_from(&self, _value: &str) -> ArgumentResult<Option<PrivateKey>> {
        Ok(None)
    }

    /// Resolve a password.
    ///
    /// # Errors
    ///
    /// Returns an error if the input was accepted but is unusable.
    fn try_password(&self, _value: &str) -> ArgumentResult<Option<Password>> {
        Ok(None)
    }

    /// Resolve the cards a token refers to.
    ///
    /// # Errors
    ///
    /// Returns an error if the input was accepted but is unusable.
    fn try_cards(&self, _token: &ArgumentToken) -> ArgumentResult<Option<Vec<Card>>> {
        Ok(None)
    }
}
