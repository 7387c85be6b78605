//! Algorithm names and inline key material.

use keyroute_args::ArgumentToken;
use keyroute_core::encoding::decode_base64;
use keyroute_core::error::ArgumentResult;
use keyroute_core::{HashAlgorithm, KeyAlgorithm, PrivateKey, PublicKey};

use crate::resolver::{SourceKind, ValueResolver};

/// Resolves algorithm names and base64 key material.
///
/// Keys are accepted only for `pubkey:` and `privkey:` tokens whose value
/// decodes as base64.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumeratedResolver;

impl EnumeratedResolver {
    /// Create an enumerated resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn decode(value: &str) -> Option<Vec<u8>> {
        decode_base64(value).ok().filter(|bytes| !bytes.is_empty())
    }
}

impl ValueResolver for EnumeratedResolver {
    fn name(&self) -> &str {
        "enumerated"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Enumerated
    }

    fn try_key_algorithm(&self, value: &str) -> ArgumentResult<Option<KeyAlgorithm>> {
        Ok(KeyAlgorithm::from_name(value))
    }

    fn try_hash_algorithm(&self, value: &str) -> ArgumentResult<Option<HashAlgorithm>> {
        Ok(HashAlgorithm::from_name(value))
    }

    fn try_public_key(&self, token: &ArgumentToken) -> ArgumentResult<Option<PublicKey>> {
        if token.key() != "pubkey" {
            return Ok(None);
        }
        Ok(Self::decode(token.value()).map(|bytes| PublicKey::new(bytes, token.alias())))
    }

    fn try_private_key(&self, token: &ArgumentToken) -> ArgumentResult<Option<PrivateKey>> {
        if token.key() != "privkey" {
            return Ok(None);
        }
        Ok(Self::decode(token.value()).map(|bytes| PrivateKey::new(bytes, token.alias())))
    }

    fn try_private_key_from(&self, value: &str) -> ArgumentResult<Option<PrivateKey>> {
        Ok(Self::decode(value).map(|bytes| PrivateKey::new(bytes, "")))
    }
}
