//! Values stored in files.

use std::fs;
use std::path::Path;

use keyroute_args::ArgumentToken;
use keyroute_core::error::{ArgumentError, ArgumentResult};
use keyroute_core::{Card, Password, PrivateKey, PublicKey};

use crate::resolver::{SourceKind, ValueResolver};

/// Reads values from the file a value names.
///
/// Declines when the value is not a path to an existing regular file.
///
/// - Passwords: the first line of the file.
/// - Keys: the whole file, aliased by the token alias.
/// - Cards: the file text imported as a single card.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileResolver;

impl FileResolver {
    /// Create a file resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn existing(value: &str) -> Option<&Path> {
        let path = Path::new(value);
        path.is_file().then_some(path)
    }

    fn read_bytes(path: &Path) -> ArgumentResult<Vec<u8>> {
        fs::read(path).map_err(|e| ArgumentError::io(format!("failed to read {}", path.display()), e))
    }

    fn read_text(path: &Path) -> ArgumentResult<String> {
        fs::read_to_string(path)
            .map_err(|e| ArgumentError::io(format!("failed to read {}", path.display()), e))
    }
}

impl ValueResolver for FileResolver {
    fn name(&self) -> &str {
        "file"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn try_public_key(&self, token: &ArgumentToken) -> ArgumentResult<Option<PublicKey>> {
        Self::existing(token.value())
            .map(|path| Ok(PublicKey::new(Self::read_bytes(path)?, token.alias())))
            .transpose()
    }

    fn try_private_key(&self, token: &ArgumentToken) -> ArgumentResult<Option<PrivateKey>> {
        Self::existing(token.value())
            .map(|path| Ok(PrivateKey::new(Self::read_bytes(path)?, token.alias())))
            .transpose()
    }

    fn try_private_key_from(&self, value: &str) -> ArgumentResult<Option<PrivateKey>> {
        Self::existing(value)
            .map(|path| Ok(PrivateKey::new(Self::read_bytes(path)?, "")))
            .transpose()
    }

    fn try_password(&self, value: &str) -> ArgumentResult<Option<Password>> {
        Self::existing(value)
            .map(|path| {
                let text = Self::read_text(path)?;
                Ok(Password::new(text.lines().next().unwrap_or_default()))
            })
            .transpose()
    }

    fn try_cards(&self, token: &ArgumentToken) -> ArgumentResult<Option<Vec<Card>>> {
        Self::existing(token.value())
            .map(|path| Ok(vec![Card::import_from_string(&Self::read_text(path)?)?]))
            .transpose()
    }
}
