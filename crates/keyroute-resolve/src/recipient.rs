//! Recipient dispatch.
//!
//! A recipient argument such as `email:alice@example.com` or
//! `privkey:alice.key:Alice` names who can open an encrypted message. The
//! token's key selects the strategy; its value and alias are resolved
//! through the [`ValueResolutionChain`] only when the recipient is added to
//! (or used to decrypt with) a [`Cipher`].
//!
//! # Examples
//!
//! ```
//! use keyroute_args::ArgumentToken;
//! use keyroute_resolve::{KeyRecipient, Recipient};
//!
//! let token = ArgumentToken::parse("email:alice@example.com").expect("valid token");
//! let recipient = Recipient::create(&token).expect("known tag");
//! assert!(matches!(recipient, Recipient::Key(KeyRecipient::Email(_))));
//!
//! let token = ArgumentToken::parse("phone:555").expect("valid token");
//! assert!(Recipient::create(&token).is_err());
//! ```

use std::fmt;

use keyroute_args::ArgumentToken;
use keyroute_core::error::{ArgumentError, CryptoError, Result};
use keyroute_core::{Card, Password, PublicKey};
use tracing::{debug, info};

use crate::chain::ValueResolutionChain;
use crate::cipher::Cipher;
use crate::resolver::SourceKinds;

/// Every recipient tag, in the order they are reported.
pub const RECIPIENT_TAGS: [&str; 5] = ["password", "email", "pubkey", "privkey", "vcard"];

/// A recipient of an encrypted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// A shared password.
    Password(ArgumentToken),
    /// A key, found by one of the [`KeyRecipient`] strategies.
    Key(KeyRecipient),
}

/// How a key recipient finds its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRecipient {
    /// Cards published for an email address.
    Email(ArgumentToken),
    /// Cards given by id, file or inline text.
    Card(ArgumentToken),
    /// A public key.
    PublicKey(ArgumentToken),
    /// A private key; its public half is used for encryption.
    PrivateKey(ArgumentToken),
}

impl KeyRecipient {
    const fn token(&self) -> &ArgumentToken {
        match self {
            Self::Email(token)
            | Self::Card(token)
            | Self::PublicKey(token)
            | Self::PrivateKey(token) => token,
        }
    }
}

fn identifier(alias: &str) -> Option<&[u8]> {
    (!alias.is_empty()).then_some(alias.as_bytes())
}

impl Recipient {
    /// Select the strategy for `token` by its key.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidRecipient`] for an unknown key.
    pub fn create(token: &ArgumentToken) -> std::result::Result<Self, ArgumentError> {
        let token = token.clone();
        let recipient = match token.key() {
            "password" => Self::Password(token),
            "email" => Self::Key(KeyRecipient::Email(token)),
            "pubkey" => Self::Key(KeyRecipient::PublicKey(token)),
            "privkey" => Self::Key(KeyRecipient::PrivateKey(token)),
            "vcard" => Self::Key(KeyRecipient::Card(token)),
            other => return Err(ArgumentError::invalid_recipient(other, &RECIPIENT_TAGS)),
        };
        Ok(recipient)
    }

    /// The token this recipient was built from.
    #[must_use]
    pub const fn token(&self) -> &ArgumentToken {
        match self {
            Self::Password(token) => token,
            Self::Key(key) => key.token(),
        }
    }

    /// Add this recipient to `cipher` for encryption.
    ///
    /// `key_password` unlocks a private key recipient and is ignored by the
    /// other strategies.
    ///
    /// # Errors
    ///
    /// Returns an argument error if the recipient's value cannot be resolved,
    /// [`ArgumentError::RecipientNotFound`] if an email has no cards, or the
    /// cipher's error.
    pub fn add_to(
        &self,
        cipher: &mut dyn Cipher,
        resolver: &ValueResolutionChain,
        kinds: SourceKinds,
        key_password: &Password,
    ) -> Result<()> {
        debug!(recipient = %self, "Add recipient");
        match self {
            Self::Password(token) => {
                let password = resolver.read_password(token.value(), kinds)?;
                cipher.add_password_recipient(&password)?;
            }
            Self::Key(KeyRecipient::Email(token)) => {
                for key in email_keys(token, resolver, kinds)? {
                    cipher.add_key_recipient(identifier(key.alias()), &key)?;
                }
            }
            Self::Key(KeyRecipient::Card(token)) => {
                let cards = resolver.read_cards(token, kinds)?;
                for key in card_keys(&cards, token.alias())? {
                    cipher.add_key_recipient(identifier(key.alias()), &key)?;
                }
            }
            Self::Key(KeyRecipient::PublicKey(token)) => {
                let key = resolver.read_public_key(token, kinds)?;
                cipher.add_key_recipient(identifier(token.alias()), &key)?;
            }
            Self::Key(KeyRecipient::PrivateKey(token)) => {
                let key = resolver.read_private_key(token, kinds)?;
                cipher.add_private_key_recipient(identifier(token.alias()), &key, key_password)?;
            }
        }
        Ok(())
    }

    /// Decrypt with this recipient.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Unsupported`] for recipients that only hold a
    /// public key, an argument error if the value cannot be resolved, or the
    /// cipher's error.
    pub fn decrypt_with(
        &self,
        cipher: &mut dyn Cipher,
        resolver: &ValueResolutionChain,
        kinds: SourceKinds,
        key_password: &Password,
    ) -> Result<()> {
        debug!(recipient = %self, "Decrypt with recipient");
        match self {
            Self::Password(token) => {
                let password = resolver.read_password(token.value(), kinds)?;
                cipher.decrypt_with_password(&password)?;
            }
            Self::Key(KeyRecipient::PrivateKey(token)) => {
                let key = resolver.read_private_key(token, kinds)?;
                cipher.decrypt_with_key(identifier(token.alias()), &key, key_password)?;
            }
            Self::Key(other) => {
                return Err(CryptoError::unsupported(format!(
                    "decrypt with the public key of '{}'",
                    other.token()
                ))
                .into());
            }
        }
        Ok(())
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.token(), f)
    }
}

fn email_keys(
    token: &ArgumentToken,
    resolver: &ValueResolutionChain,
    kinds: SourceKinds,
) -> Result<Vec<PublicKey>> {
    let not_found = || ArgumentError::recipient_not_found("email", token.value());
    let cards = match resolver.read_cards(token, kinds) {
        Ok(cards) => cards,
        Err(ArgumentError::ValueSourceExhausted { .. }) => return Err(not_found().into()),
        Err(e) => return Err(e.into()),
    };
    if cards.is_empty() {
        return Err(not_found().into());
    }
    info!(email = token.value(), cards = cards.len(), "Cards found for email");
    card_keys(&cards, token.alias())
}

fn card_keys(cards: &[Card], alias: &str) -> Result<Vec<PublicKey>> {
    cards
        .iter()
        .map(|card| card.to_public_key(alias).map_err(Into::into))
        .collect()
}
