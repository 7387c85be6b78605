//! Typed argument getters for commands.
//!
//! [`ArgumentIo`] couples the [`ArgumentSourceChain`] that finds raw values
//! with the [`ValueResolutionChain`] that turns them into domain values.
//! Each getter reads one well-known argument, validates its shape and
//! resolves it, so a command never handles raw strings.
//!
//! ```
//! use keyroute_args::source::DefaultsSource;
//! use keyroute_args::ArgumentSourceChain;
//! use keyroute_core::KeyAlgorithm;
//! use keyroute_resolve::io::{names, ArgumentIo};
//! use keyroute_resolve::{EnumeratedResolver, ValueResolutionChain};
//!
//! let mut sources = ArgumentSourceChain::new()
//!     .with(DefaultsSource::new().with(names::ALGORITHM, "ed25519"));
//! sources.init().expect("defaults always initialise");
//!
//! let mut io = ArgumentIo::new(sources, ValueResolutionChain::new().with(EnumeratedResolver::new()));
//! assert_eq!(io.get_key_algorithm().expect("known algorithm"), KeyAlgorithm::Ed25519);
//! ```

use std::path::PathBuf;

use keyroute_args::validation::{is_any, is_enum, is_key_value, is_not_empty, is_token};
use keyroute_args::{
    names as reserved, Argument, ArgumentImportance, ArgumentSourceChain, ArgumentToken,
    ArgumentValue, Validation,
};
use keyroute_core::error::{ArgumentError, ArgumentResult};
use keyroute_core::{
    CardScope, HashAlgorithm, KeyAlgorithm, Password, PrivateKey, PublicKey, RevocationReason,
};
use tracing::info;

use crate::chain::ValueResolutionChain;
use crate::recipient::Recipient;
use crate::resolver::SourceKinds;

/// Names of the arguments [`ArgumentIo`] reads.
pub mod names {
    /// Key algorithm name.
    pub const ALGORITHM: &str = "algorithm";
    /// Hash algorithm name.
    pub const HASH_ALGORITHM: &str = "hash-algorithm";
    /// Input file; standard input when absent.
    pub const IN: &str = "in";
    /// Output file; standard output when absent.
    pub const OUT: &str = "out";
    /// Detached content info file.
    pub const CONTENT_INFO: &str = "content-info";
    /// Flag: the private key has no password.
    pub const NO_PASSWORD: &str = "no-password";
    /// Private key password.
    pub const PRIVATE_KEY_PASSWORD: &str = "private-key-password";
    /// Private key.
    pub const KEY: &str = "key";
    /// Encryption recipients.
    pub const RECIPIENT_ID: &str = "recipient-id";
    /// Decryption credentials.
    pub const KEYPASS: &str = "keypass";
    /// Card identity as `type:value`.
    pub const IDENTITY: &str = "identity";
    /// Card scope.
    pub const SCOPE: &str = "scope";
    /// Directory application token.
    pub const APPLICATION_TOKEN: &str = "application-token";
    /// Card id.
    pub const CARD_ID: &str = "card-id";
    /// Revocation reason.
    pub const REASON: &str = "reason";
    /// Public key file or base64 text.
    pub const PUBLIC_KEY: &str = "public-key";
}

/// Typed access to command arguments.
#[derive(Debug)]
pub struct ArgumentIo {
    source: ArgumentSourceChain,
    resolver: ValueResolutionChain,
}

impl ArgumentIo {
    /// Couple an initialised source chain with a resolution chain.
    #[must_use]
    pub fn new(source: ArgumentSourceChain, resolver: ValueResolutionChain) -> Self {
        Self { source, resolver }
    }

    /// The source chain, for reads without a typed getter.
    pub fn source_mut(&mut self) -> &mut ArgumentSourceChain {
        &mut self.source
    }

    /// The resolution chain, for recipients.
    #[must_use]
    pub fn resolver(&self) -> &ValueResolutionChain {
        &self.resolver
    }

    fn read_checked(
        &mut self,
        name: &str,
        importance: ArgumentImportance,
        validation: &impl Validation,
    ) -> ArgumentResult<Argument> {
        let argument = self.source.read(name, importance)?;
        validation.validate(name, &argument, importance)?;
        Ok(argument)
    }

    fn read_text(
        &mut self,
        name: &str,
        importance: ArgumentImportance,
        validation: &impl Validation,
    ) -> ArgumentResult<String> {
        let argument = self.read_checked(name, importance, validation)?;
        if argument.is_empty() {
            return Ok(String::new());
        }
        Ok(argument.into_value()?.into_text())
    }

    fn read_recipients(&mut self, name: &str) -> ArgumentResult<Vec<Recipient>> {
        let argument = self.source.read_list(name, ArgumentImportance::Required)?;
        is_token()
            .validate_list(name, argument, ArgumentImportance::Required)?
            .iter()
            .map(|value| Recipient::create(value.parse().as_token()?))
            .collect()
    }

    /// Whether a detached content info file was given.
    ///
    /// # Errors
    ///
    /// Returns the error of the answering source.
    pub fn has_content_info(&mut self) -> ArgumentResult<bool> {
        Ok(!self
            .source
            .read_string(names::CONTENT_INFO, ArgumentImportance::Optional)?
            .is_empty())
    }

    /// Whether `--no-password` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] if the value is not flag-like.
    pub fn has_no_password(&mut self) -> ArgumentResult<bool> {
        self.source.read_bool(names::NO_PASSWORD)
    }

    /// Whether prompting for required arguments is allowed.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.source.rules().allow_interactive
    }

    /// The subcommand path, e.g. `card create`, if any.
    ///
    /// # Errors
    ///
    /// Returns the error of the answering source.
    pub fn get_command(&mut self) -> ArgumentResult<Option<String>> {
        let command = self
            .source
            .read_string(reserved::COMMAND, ArgumentImportance::Optional)?;
        Ok((!command.is_empty()).then_some(command))
    }

    /// The key algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::NotFound`] if absent, or
    /// [`ArgumentError::Validation`] for an unknown name.
    pub fn get_key_algorithm(&mut self) -> ArgumentResult<KeyAlgorithm> {
        let value = self.read_text(
            names::ALGORITHM,
            ArgumentImportance::Required,
            &is_enum(&KeyAlgorithm::names()),
        )?;
        self.resolver
            .read_key_algorithm(&value, SourceKinds::ENUMERATED)
    }

    /// The hash algorithm.
    ///
    /// # Errors
    ///
    /// See [`Self::get_key_algorithm`].
    pub fn get_hash_algorithm(&mut self) -> ArgumentResult<HashAlgorithm> {
        let value = self.read_text(
            names::HASH_ALGORITHM,
            ArgumentImportance::Required,
            &is_enum(&HashAlgorithm::names()),
        )?;
        self.resolver
            .read_hash_algorithm(&value, SourceKinds::ENUMERATED)
    }

    /// The private key password. Empty when `--no-password` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::NotFound`] if the password is required and
    /// no source holds it.
    pub fn get_key_password(&mut self) -> ArgumentResult<Password> {
        info!("Read private key password.");
        if self.has_no_password()? {
            return Ok(Password::empty());
        }
        let password = self.read_text(
            names::PRIVATE_KEY_PASSWORD,
            ArgumentImportance::Required,
            &is_not_empty(),
        )?;
        Ok(Password::new(password))
    }

    /// The private key password, empty when absent.
    ///
    /// # Errors
    ///
    /// Returns the error of the answering source.
    pub fn get_key_password_optional(&mut self) -> ArgumentResult<Password> {
        info!("Read optional private key password.");
        let password = self.read_text(
            names::PRIVATE_KEY_PASSWORD,
            ArgumentImportance::Optional,
            &is_any(),
        )?;
        Ok(Password::new(password))
    }

    /// The private key, from a file or base64 text.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::NotFound`] if absent, or
    /// [`ArgumentError::ValueSourceExhausted`] if the value is neither.
    pub fn get_private_key(&mut self) -> ArgumentResult<PrivateKey> {
        let value = self.read_text(names::KEY, ArgumentImportance::Required, &is_not_empty())?;
        self.resolver
            .read_private_key_from(&value, SourceKinds::LOCAL)
    }

    /// The public key, from a file, base64 text or a `pubkey:` token.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::NotFound`] if absent, or
    /// [`ArgumentError::ValueSourceExhausted`] if it cannot be resolved.
    pub fn get_public_key(&mut self) -> ArgumentResult<PublicKey> {
        let argument = self.read_checked(
            names::PUBLIC_KEY,
            ArgumentImportance::Required,
            &is_not_empty(),
        )?;
        let token = match argument.as_value()?.parse() {
            ArgumentValue::KeyValue { token, .. } | ArgumentValue::KeyValueAlias { token, .. } => {
                token
            }
            other => ArgumentToken::new("pubkey", other.to_string(), "")?,
        };
        self.resolver.read_public_key(&token, SourceKinds::LOCAL)
    }

    /// Encryption recipients from `<recipient-id>...`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Validation`] for a malformed token or
    /// [`ArgumentError::InvalidRecipient`] for an unknown tag.
    pub fn get_encrypt_recipients(&mut self) -> ArgumentResult<Vec<Recipient>> {
        self.read_recipients(names::RECIPIENT_ID)
    }

    /// Decryption credentials from `<keypass>...`.
    ///
    /// # Errors
    ///
    /// See [`Self::get_encrypt_recipients`].
    pub fn get_decrypt_recipients(&mut self) -> ArgumentResult<Vec<Recipient>> {
        self.read_recipients(names::KEYPASS)
    }

    /// The input file, `None` for standard input.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::FileNotFound`] if the named file does not
    /// exist.
    pub fn get_input(&mut self) -> ArgumentResult<Option<PathBuf>> {
        let path = self
            .source
            .read_string(names::IN, ArgumentImportance::Optional)?;
        if path.is_empty() {
            return Ok(None);
        }
        let path = PathBuf::from(path);
        if !path.is_file() {
            return Err(ArgumentError::file_not_found(path.display().to_string()));
        }
        Ok(Some(path))
    }

    /// The output file, `None` for standard output.
    ///
    /// # Errors
    ///
    /// Returns the error of the answering source.
    pub fn get_output(&mut self) -> ArgumentResult<Option<PathBuf>> {
        let path = self
            .source
            .read_string(names::OUT, ArgumentImportance::Optional)?;
        Ok((!path.is_empty()).then(|| PathBuf::from(path)))
    }

    /// The card identity as a `type:value` token.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Validation`] unless the value is a token
    /// without alias.
    pub fn get_card_identity(&mut self) -> ArgumentResult<ArgumentToken> {
        let argument =
            self.read_checked(names::IDENTITY, ArgumentImportance::Required, &is_key_value())?;
        argument.as_value()?.parse().as_key_value().cloned()
    }

    /// The card scope, `application` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Validation`] for an unknown scope.
    pub fn get_card_scope(&mut self) -> ArgumentResult<CardScope> {
        let scope = self.read_text(
            names::SCOPE,
            ArgumentImportance::Optional,
            &is_enum(&[CardScope::Global.as_str(), CardScope::Application.as_str()]),
        )?;
        if scope.is_empty() {
            return Ok(CardScope::default());
        }
        scope.parse()
    }

    /// The directory application token, if any.
    ///
    /// # Errors
    ///
    /// Returns the error of the answering source.
    pub fn get_application_token(&mut self) -> ArgumentResult<Option<String>> {
        let token = self
            .source
            .read_string(names::APPLICATION_TOKEN, ArgumentImportance::Optional)?;
        Ok((!token.is_empty()).then_some(token))
    }

    /// The card id.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::NotFound`] if absent.
    pub fn get_card_id(&mut self) -> ArgumentResult<String> {
        self.read_text(names::CARD_ID, ArgumentImportance::Required, &is_not_empty())
    }

    /// The revocation reason, `unspecified` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Validation`] for an unknown reason.
    pub fn get_revocation_reason(&mut self) -> ArgumentResult<RevocationReason> {
        let reason = self.read_text(
            names::REASON,
            ArgumentImportance::Optional,
            &is_enum(&[
                RevocationReason::Unspecified.as_str(),
                RevocationReason::Compromised.as_str(),
            ]),
        )?;
        if reason.is_empty() {
            return Ok(RevocationReason::default());
        }
        reason.parse()
    }
}
