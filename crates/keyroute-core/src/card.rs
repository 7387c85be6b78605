//! Card model.
//!
//! A card binds an identity (an email address, an application name, ...) to
//! a public key. Cards are looked up in a directory by identity or id, or
//! imported from a file or inline text.
//!
//! # Transport Format
//!
//! A card travels as JSON, optionally wrapped in base64 so it fits on one
//! line:
//!
//! ```
//! use keyroute_core::card::{Card, CardScope};
//!
//! let card = Card::import_from_string(r#"{
//!     "id": "3f2a",
//!     "identity": "alice@example.com",
//!     "identity_type": "email",
//!     "scope": "application",
//!     "public_key": "AAEC",
//!     "created_at": "2024-01-01T00:00:00Z"
//! }"#).expect("valid card");
//!
//! assert_eq!(card.scope, CardScope::Application);
//! assert_eq!(card.public_key_bytes().expect("base64"), vec![0, 1, 2]);
//!
//! let line = card.export_to_string().expect("serializable");
//! assert_eq!(Card::import_from_string(&line).expect("round trip"), card);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::encoding::{decode_base64, encode_base64};
use crate::error::ArgumentError;
use crate::types::PublicKey;

/// Where a card is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardScope {
    /// Visible to every application.
    Global,
    /// Visible to the owning application only.
    #[default]
    Application,
}

impl CardScope {
    /// Returns the lowercase scope name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Application => "application",
        }
    }
}

impl fmt::Display for CardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardScope {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "application" => Ok(Self::Application),
            _ => Err(ArgumentError::value("--scope", s)),
        }
    }
}

/// A published identity card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Directory-assigned identifier.
    pub id: String,
    /// The identity value (e.g. `alice@example.com`).
    pub identity: String,
    /// The identity kind (e.g. `email`).
    pub identity_type: String,
    /// Visibility scope.
    #[serde(default)]
    pub scope: CardScope,
    /// Base64-encoded public key.
    pub public_key: String,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Decode the card's public key.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Parse`] if the key is not valid base64.
    pub fn public_key_bytes(&self) -> Result<Vec<u8>, ArgumentError> {
        decode_base64(&self.public_key).map_err(|e| {
            ArgumentError::parse(format!(
                "Card '{}' has a malformed public key: {e}.",
                self.id
            ))
        })
    }

    /// Build a [`PublicKey`] from this card.
    ///
    /// The key alias is `alias` when non-empty, otherwise the card id.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Parse`] if the key is not valid base64.
    pub fn to_public_key(&self, alias: &str) -> Result<PublicKey, ArgumentError> {
        let alias = if alias.is_empty() { &self.id } else { alias };
        Ok(PublicKey::new(self.public_key_bytes()?, alias))
    }

    /// Import a card from JSON or base64-wrapped JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Parse`] if the text is neither.
    pub fn import_from_string(text: &str) -> Result<Self, ArgumentError> {
        let trimmed = text.trim();
        let invalid = || {
            ArgumentError::parse(format!(
                "Invalid format. Can not import Card from the text: '{trimmed}'."
            ))
        };

        if trimmed.starts_with('{') {
            return serde_json::from_str(trimmed).map_err(|_| invalid());
        }

        let decoded = decode_base64(trimmed).map_err(|_| invalid())?;
        serde_json::from_slice(&decoded).map_err(|_| invalid())
    }

    /// Export the card as single-line base64-wrapped JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the card cannot be serialized.
    pub fn export_to_string(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(encode_base64(&json))
    }
}

/// Search criteria for a directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// The identity kind to match.
    pub identity_type: String,
    /// Identity values; a card matches if it has any of them.
    pub identities: Vec<String>,
    /// The scope to search.
    pub scope: CardScope,
}

impl SearchCriteria {
    /// Create criteria for a single identity.
    #[must_use]
    pub fn new(scope: CardScope, identity_type: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            identity_type: identity_type.into(),
            identities: vec![identity.into()],
            scope,
        }
    }

    /// Returns `true` if the card satisfies these criteria.
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        card.scope == self.scope
            && card.identity_type == self.identity_type
            && self.identities.iter().any(|identity| *identity == card.identity)
    }
}

/// A request to publish a new card.
#[derive(Debug, Clone)]
pub struct CardRequest {
    /// The identity value.
    pub identity: String,
    /// The identity kind.
    pub identity_type: String,
    /// Visibility scope.
    pub scope: CardScope,
    /// The key to publish.
    pub public_key: PublicKey,
    /// Free-form metadata.
    pub data: BTreeMap<String, String>,
}

/// Why a card was revoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationReason {
    /// No reason given.
    #[default]
    Unspecified,
    /// The private key was compromised.
    Compromised,
}

impl RevocationReason {
    /// Returns the lowercase reason name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Compromised => "compromised",
        }
    }
}

impl FromStr for RevocationReason {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unspecified" => Ok(Self::Unspecified),
            "compromised" => Ok(Self::Compromised),
            _ => Err(ArgumentError::value("--reason", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    fn sample_card() -> Card {
        Card {
            id: "c0ffee".to_string(),
            identity: "alice@example.com".to_string(),
            identity_type: "email".to_string(),
            scope: CardScope::Global,
            public_key: STANDARD.encode([7u8, 8, 9]),
            data: BTreeMap::new(),
            created_at: DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_import_json() {
        let json = serde_json::to_string(&sample_card()).unwrap();
        let card = Card::import_from_string(&json).unwrap();
        assert_eq!(card, sample_card());
    }

    #[test]
    fn test_import_base64_with_whitespace() {
        let exported = sample_card().export_to_string().unwrap();
        let card = Card::import_from_string(&format!("  {exported}\n")).unwrap();
        assert_eq!(card.id, "c0ffee");
    }

    #[test]
    fn test_import_base64_without_padding() {
        let exported = sample_card().export_to_string().unwrap();
        let card = Card::import_from_string(exported.trim_end_matches('=')).unwrap();
        assert_eq!(card, sample_card());
    }

    #[test]
    fn test_import_garbage_fails_with_text() {
        let err = Card::import_from_string("not a card").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid format. Can not import Card from the text: 'not a card'."
        );
    }

    #[test]
    fn test_to_public_key_alias() {
        let card = sample_card();
        assert_eq!(card.to_public_key("").unwrap().alias(), "c0ffee");
        assert_eq!(card.to_public_key("Alice").unwrap().alias(), "Alice");
        assert_eq!(card.to_public_key("").unwrap().as_bytes(), &[7, 8, 9]);
    }

    #[test]
    fn test_malformed_public_key() {
        let mut card = sample_card();
        card.public_key = "%%%".to_string();
        assert!(matches!(
            card.public_key_bytes(),
            Err(ArgumentError::Parse { .. })
        ));
    }

    #[test]
    fn test_search_criteria_matches() {
        let card = sample_card();
        assert!(SearchCriteria::new(CardScope::Global, "email", "alice@example.com").matches(&card));
        assert!(!SearchCriteria::new(CardScope::Application, "email", "alice@example.com").matches(&card));
        assert!(!SearchCriteria::new(CardScope::Global, "email", "bob@example.com").matches(&card));
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!("GLOBAL".parse::<CardScope>().unwrap(), CardScope::Global);
        assert!("everywhere".parse::<CardScope>().is_err());
        assert_eq!(CardScope::default(), CardScope::Application);
    }

    #[test]
    fn test_revocation_reason_parse() {
        assert_eq!(
            "compromised".parse::<RevocationReason>().unwrap(),
            RevocationReason::Compromised
        );
        assert!("lost".parse::<RevocationReason>().is_err());
    }
}
