//! The cipher seam.
//!
//! Recipients add themselves to, or decrypt through, a [`Cipher`]. The
//! cipher owns the actual cryptography; identifiers are passed as `None`
//! when the recipient has no alias, and the cipher derives one from the key.

use keyroute_core::error::CryptoResult;
use keyroute_core::{Password, PrivateKey, PublicKey};

/// Encryption and decryption primitives used by recipients.
pub trait Cipher {
    /// Encrypt for a public key.
    ///
    /// # Errors
    ///
    /// Returns a [`keyroute_core::CryptoError`] if the key is unusable.
    fn add_key_recipient(&mut self, identifier: Option<&[u8]>, key: &PublicKey) -> CryptoResult<()>;

    /// Encrypt for the public half of a private key.
    ///
    /// # Errors
    ///
    /// Returns a [`keyroute_core::CryptoError`] if the key cannot be
    /// opened with `password`.
    fn add_private_key_recipient(
        &mut self,
        identifier: Option<&[u8]>,
        key: &PrivateKey,
        password: &Password,
    ) -> CryptoResult<()>;

    /// Encrypt for a password.
    ///
    /// # Errors
    ///
    /// Returns a [`keyroute_core::CryptoError`] on failure.
    fn add_password_recipient(&mut self, password: &Password) -> CryptoResult<()>;

    /// Decrypt with a private key.
    ///
    /// # Errors
    ///
    /// Returns a [`keyroute_core::CryptoError`] if decryption fails.
    fn decrypt_with_key(
        &mut self,
        identifier: Option<&[u8]>,
        key: &PrivateKey,
        password: &Password,
    ) -> CryptoResult<()>;

    /// Decrypt with a password.
    ///
    /// # Errors
    ///
    /// Returns a [`keyroute_core::CryptoError`] if decryption fails.
    fn decrypt_with_password(&mut self, password: &Password) -> CryptoResult<()>;
}

#[cfg(any(test, feature = "mock"))]
mod recording {
    use keyroute_core::error::CryptoResult;
    use keyroute_core::{Password, PrivateKey, PublicKey};

    use super::Cipher;

    /// One call made on a [`RecordingCipher`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum CipherCall {
        /// `add_key_recipient`
        AddKey {
            /// Identifier as text, `None` when derived by the cipher.
            identifier: Option<String>,
            /// Key bytes.
            key: Vec<u8>,
        },
        /// `add_private_key_recipient`
        AddPrivateKey {
            /// Identifier as text.
            identifier: Option<String>,
            /// Whether a non-empty key password was given.
            has_password: bool,
        },
        /// `add_password_recipient`
        AddPassword {
            /// Password length.
            len: usize,
        },
        /// `decrypt_with_key`
        DecryptWithKey {
            /// Identifier as text.
            identifier: Option<String>,
            /// Whether a non-empty key password was given.
            has_password: bool,
        },
        /// `decrypt_with_password`
        DecryptWithPassword {
            /// Password length.
            len: usize,
        },
    }

    /// A cipher that records calls instead of encrypting.
    #[derive(Debug, Default)]
    pub struct RecordingCipher {
        /// Calls in order.
        pub calls: Vec<CipherCall>,
    }

    impl RecordingCipher {
        /// An empty recorder.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    fn text(identifier: Option<&[u8]>) -> Option<String> {
        identifier.map(|id| String::from_utf8_lossy(id).into_owned())
    }

    impl Cipher for RecordingCipher {
        fn add_key_recipient(&mut self, identifier: Option<&[u8]>, key: &PublicKey) -> CryptoResult<()> {
            self.calls.push(CipherCall::AddKey {
                identifier: text(identifier),
                key: key.as_bytes().to_vec(),
            });
            Ok(())
        }

        fn add_private_key_recipient(
            &mut self,
            identifier: Option<&[u8]>,
            _key: &PrivateKey,
            password: &Password,
        ) -> CryptoResult<()> {
            self.calls.push(CipherCall::AddPrivateKey {
                identifier: text(identifier),
                has_password: !password.is_empty(),
            });
            Ok(())
        }

        fn add_password_recipient(&mut self, password: &Password) -> CryptoResult<()> {
            self.calls.push(CipherCall::AddPassword {
                len: password.as_bytes().len(),
            });
            Ok(())
        }

        fn decrypt_with_key(
            &mut self,
            identifier: Option<&[u8]>,
            _key: &PrivateKey,
            password: &Password,
        ) -> CryptoResult<()> {
            self.calls.push(CipherCall::DecryptWithKey {
                identifier: text(identifier),
                has_password: !password.is_empty(),
            });
            Ok(())
        }

        fn decrypt_with_password(&mut self, password: &Password) -> CryptoResult<()> {
            self.calls.push(CipherCall::DecryptWithPassword {
                len: password.as_bytes().len(),
            });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use recording::{CipherCall, RecordingCipher};
