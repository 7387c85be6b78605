//! The value resolution chain.
//!
//! Resolvers are asked in insertion order; the first that accepts wins. A
//! per-call [`SourceKinds`] mask narrows which resolvers are asked without
//! changing the chain, so encryption can consult the directory while
//! decryption stays local.
//!
//! ```
//! use keyroute_resolve::{EnumeratedResolver, SourceKinds, TextResolver, ValueResolutionChain};
//! use keyroute_core::KeyAlgorithm;
//!
//! let chain = ValueResolutionChain::new()
//!     .with(EnumeratedResolver::new())
//!     .with(TextResolver::new());
//!
//! let algorithm = chain.read_key_algorithm("ed25519", SourceKinds::ALL).expect("known name");
//! assert_eq!(algorithm, KeyAlgorithm::Ed25519);
//!
//! let err = chain.read_key_algorithm("ed25519", SourceKinds::TEXT).unwrap_err();
//! assert_eq!(err.to_string(), "Can not read key algorithm from the value: 'ed25519'.");
//! ```

use keyroute_args::ArgumentToken;
use keyroute_core::error::{ArgumentError, ArgumentResult};
use keyroute_core::{Card, HashAlgorithm, KeyAlgorithm, Password, PrivateKey, PublicKey};
use tracing::debug;

use crate::resolver::{SourceKinds, ValueResolver};

/// Text shown for values that must not be logged.
const HIDDEN: &str = "<hidden>";

/// Ordered resolvers, first acceptance wins.
#[derive(Default)]
pub struct ValueResolutionChain {
    resolvers: Vec<Box<dyn ValueResolver>>,
}

impl ValueResolutionChain {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver with the lowest priority so far.
    #[must_use]
    pub fn with(mut self, resolver: impl ValueResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Append a resolver with the lowest priority so far.
    pub fn add(&mut self, resolver: Box<dyn ValueResolver>) -> &mut Self {
        self.resolvers.push(resolver);
        self
    }

    /// Resolver names in priority order.
    #[must_use]
    pub fn resolver_names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    fn first<T>(
        &self,
        kinds: SourceKinds,
        kind_name: &'static str,
        shown: &str,
        mut attempt: impl FnMut(&dyn ValueResolver) -> ArgumentResult<Option<T>>,
    ) -> ArgumentResult<T> {
        for resolver in self.resolvers.iter().filter(|r| kinds.contains(r.kind())) {
            debug!("Try read {kind_name} from the source: {}.", resolver.name());
            if let Some(value) = attempt(resolver.as_ref())? {
                return Ok(value);
            }
        }
        debug!("Failed to read {kind_name} from any source.");
        Err(ArgumentError::value_source_exhausted(kind_name, shown))
    }

    /// Resolve a key algorithm name.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::ValueSourceExhausted`] if every selected
    /// resolver declines, or the error of the accepting resolver.
    pub fn read_key_algorithm(&self, value: &str, kinds: SourceKinds) -> ArgumentResult<KeyAlgorithm> {
        self.first(kinds, "key algorithm", value, |r| r.try_key_algorithm(value))
    }

    /// Resolve a hash algorithm name.
    ///
    /// # Errors
    ///
    /// See [`Self::read_key_algorithm`].
    pub fn read_hash_algorithm(
        &self,
        value: &str,
        kinds: SourceKinds,
    ) -> ArgumentResult<HashAlgorithm> {
        self.first(kinds, "hash algorithm", value, |r| r.try_hash_algorithm(value))
    }

    /// Resolve the public key `token` refers to.
    ///
    /// # Errors
    ///
    /// See [`Self::read_key_algorithm`].
    pub fn read_public_key(
        &self,
        token: &ArgumentToken,
        kinds: SourceKinds,
    ) -> ArgumentResult<PublicKey> {
        self.first(kinds, "public key", &token.to_string(), |r| r.try_public_key(token))
    }

    /// Resolve the private key `token` refers to.
    ///
    /// # Errors
    ///
    /// See [`Self::read_key_algorithm`].
    pub fn read_private_key(
        &self,
        token: &ArgumentToken,
        kinds: SourceKinds,
    ) -> ArgumentResult<PrivateKey> {
        self.first(kinds, "private key", &token.to_string(), |r| r.try_private_key(token))
    }

    /// Resolve a private key from a bare value.
    ///
    /// # Errors
    ///
    /// See [`Self::read_key_algorithm`].
    pub fn read_private_key_from(
        &self,
        value: &str,
        kinds: SourceKinds,
    ) -> ArgumentResult<PrivateKey> {
        self.first(kinds, "private key", value, |r| r.try_private_key_from(value))
    }

    /// Resolve a password. The value is never echoed in errors.
    ///
    /// # Errors
    ///
    /// See [`Self::read_key_algorithm`].
    pub fn read_password(&self, value: &str, kinds: SourceKinds) -> ArgumentResult<Password> {
        self.first(kinds, "password", HIDDEN, |r| r.try_password(value))
    }

    /// Resolve the cards `token` refers to.
    ///
    /// # Errors
    ///
    /// See [`Self::read_key_algorithm`].
    pub fn read_cards(&self, token: &ArgumentToken, kinds: SourceKinds) -> ArgumentResult<Vec<Card>> {
        self.first(kinds, "cards", &token.to_string(), |r| r.try_cards(token))
    }
}

impl std::fmt::Debug for ValueResolutionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueResolutionChain")
            .field("resolvers", &self.resolver_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::resolver::SourceKind;

    /// Answers passwords with a fixed reply and counts how often it is asked.
    struct Fixed {
        name: &'static str,
        kind: SourceKind,
        reply: Option<&'static str>,
        asked: Rc<Cell<usize>>,
    }

    impl Fixed {
        fn new(name: &'static str, kind: SourceKind, reply: Option<&'static str>) -> Self {
            Self {
                name,
                kind,
                reply,
                asked: Rc::default(),
            }
        }

        fn asked(&self) -> Rc<Cell<usize>> {
            Rc::clone(&self.asked)
        }
    }

    impl ValueResolver for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn try_password(&self, _value: &str) -> ArgumentResult<Option<Password>> {
            self.asked.set(self.asked.get() + 1);
            Ok(self.reply.map(Password::new))
        }
    }

    #[test]
    fn test_first_acceptance_wins() {
        let declines = Fixed::new("declines", SourceKind::File, None);
        let accepts = Fixed::new("accepts", SourceKind::Directory, Some("one"));
        let later = Fixed::new("later", SourceKind::Text, Some("two"));
        let counts = [declines.asked(), accepts.asked(), later.asked()];
        let chain = ValueResolutionChain::new()
            .with(declines)
            .with(accepts)
            .with(later);

        let password = chain.read_password("x", SourceKinds::ALL).unwrap();
        assert_eq!(password.as_bytes(), b"one");
        assert_eq!(counts.map(|count| count.get()), [1, 1, 0]);
    }

    #[test]
    fn test_kinds_skip_resolvers() {
        let directory = Fixed::new("directory", SourceKind::Directory, Some("remote"));
        let skipped = directory.asked();
        let chain = ValueResolutionChain::new()
            .with(directory)
            .with(Fixed::new("text", SourceKind::Text, Some("local")));

        let password = chain.read_password("x", SourceKinds::LOCAL).unwrap();
        assert_eq!(password.as_bytes(), b"local");
        assert_eq!(skipped.get(), 0);
    }

    #[test]
    fn test_exhausted_hides_password() {
        let chain = ValueResolutionChain::new().with(Fixed::new("none", SourceKind::Text, None));
        let err = chain.read_password("hunter2", SourceKinds::ALL).unwrap_err();
        assert_eq!(err.to_string(), "Can not read password from the value: '<hidden>'.");
    }

    #[test]
    fn test_exhausted_masks_token() {
        let chain = ValueResolutionChain::new();
        let token = ArgumentToken::parse("privkey:alice.key").unwrap();
        let err = chain.read_private_key(&token, SourceKinds::ALL).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Can not read private key from the value: 'privkey:<hidden>'."
        );
    }

    #[test]
    fn test_empty_kinds_ask_nobody() {
        let chain = ValueResolutionChain::new().with(Fixed::new("text", SourceKind::Text, Some("x")));
        assert!(chain.read_password("x", SourceKinds::NONE).is_err());
    }
}
