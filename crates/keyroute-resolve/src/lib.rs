//! # keyroute-resolve
//!
//! Turns argument text into domain values, and recipients into cipher calls.
//!
//! ## Internal Crate Warning
//!
//! **This crate is an internal implementation detail of `keyroute`.** The API
//! is unstable and may change without notice.
//!
//! ## Modules
//!
//! - [`resolver`] - The [`ValueResolver`] trait and [`SourceKinds`] masks
//! - [`chain`] - [`ValueResolutionChain`], first acceptance wins
//! - [`file`], [`directory`], [`enumerated`], [`text`] - The resolvers
//! - [`cipher`] - The [`Cipher`] seam recipients talk to
//! - [`recipient`] - [`Recipient`] dispatch by token tag
//! - [`io`] - [`ArgumentIo`], typed getters used by commands
//!
//! ## Resolution Order
//!
//! The default chain asks, in order: files on disk, the card directory,
//! algorithm names and base64 key material, and finally the literal text.
//! Decryption passes [`SourceKinds::LOCAL`] so the directory is never
//! consulted for secrets.
//!
//! ```
//! use keyroute_args::ArgumentToken;
//! use keyroute_resolve::{default_chain, LocalCardDirectory, SourceKinds};
//! use std::sync::Arc;
//!
//! let chain = default_chain(Arc::new(LocalCardDirectory::new("/nonexistent/cards")));
//! assert_eq!(chain.resolver_names(), ["file", "directory", "enumerated", "text"]);
//!
//! let token = ArgumentToken::parse("pubkey:AQI").expect("valid token");
//! let key = chain.read_public_key(&token, SourceKinds::LOCAL).expect("base64 key");
//! assert_eq!(key.as_bytes(), &[1, 2]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::sync::Arc;

pub mod chain;
pub mod cipher;
pub mod directory;
pub mod enumerated;
pub mod file;
pub mod io;
pub mod recipient;
pub mod resolver;
pub mod text;

pub use chain::ValueResolutionChain;
pub use cipher::Cipher;
pub use directory::{DirectoryResolver, DirectoryService, LocalCardDirectory};
pub use enumerated::EnumeratedResolver;
pub use file::FileResolver;
pub use io::ArgumentIo;
pub use recipient::{KeyRecipient, Recipient, RECIPIENT_TAGS};
pub use resolver::{SourceKind, SourceKinds, ValueResolver};
pub use text::TextResolver;

#[cfg(any(test, feature = "mock"))]
pub use cipher::{CipherCall, RecordingCipher};
#[cfg(any(test, feature = "mock"))]
pub use directory::MockDirectory;

/// The standard resolver order over `directory`.
#[must_use]
pub fn default_chain(directory: Arc<dyn DirectoryService>) -> ValueResolutionChain {
    ValueResolutionChain::new()
        .with(FileResolver::new())
        .with(DirectoryResolver::new(directory))
        .with(EnumeratedResolver::new())
        .with(TextResolver::new())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

    use std::collections::BTreeMap;
    use std::fs;

    use chrono::Utc;
    use keyroute_args::ArgumentToken;
    use keyroute_core::encoding::encode_base64;
    use keyroute_core::{Card, CardScope};
    use tempfile::TempDir;

    use super::*;

    fn card(public_key: &[u8]) -> Card {
        Card {
            id: "abc123".to_string(),
            identity: "bob@example.com".to_string(),
            identity_type: "email".to_string(),
            scope: CardScope::Application,
            public_key: encode_base64(public_key),
            data: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_file_named_like_base64_reads_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("AQI");
        fs::write(&path, [9, 9, 9]).unwrap();
        let chain = default_chain(Arc::new(MockDirectory::new()));

        let token = ArgumentToken::new("pubkey", path.display().to_string().as_str(), "").unwrap();
        let key = chain.read_public_key(&token, SourceKinds::ALL).unwrap();
        assert_eq!(key.as_bytes(), &[9, 9, 9]);

        let token = ArgumentToken::parse("pubkey:AQI").unwrap();
        let key = chain.read_public_key(&token, SourceKinds::ALL).unwrap();
        assert_eq!(key.as_bytes(), &[1, 2]);
    }

    #[test]
    fn test_card_file_is_read_before_the_directory() {
        let dir = TempDir::new().unwrap();
        let from_file = card(&[4, 5]);
        let path = dir.path().join("abc123");
        fs::write(&path, from_file.export_to_string().unwrap()).unwrap();

        let directory = Arc::new(MockDirectory::with_cards(vec![card(&[7, 7])]));
        let chain = default_chain(Arc::clone(&directory) as Arc<dyn DirectoryService>);

        let token = ArgumentToken::new("vcard", path.display().to_string().as_str(), "").unwrap();
        let cards = chain.read_cards(&token, SourceKinds::ALL).unwrap();
        assert_eq!(cards, vec![from_file]);
        assert_eq!(directory.calls(), 0);

        let token = ArgumentToken::parse("vcard:abc123").unwrap();
        let cards = chain.read_cards(&token, SourceKinds::ALL).unwrap();
        assert_eq!(cards[0].public_key, encode_base64(&[7, 7]));
        assert_eq!(directory.calls(), 1);
    }
}
