//! # Card Commands
//!
//! `keyroute card search|get|create|revoke` work with the card directory.
//!
//! ## Usage
//!
//! ```text
//! keyroute card search email:alice@example.com --scope global
//! keyroute card get 3f2a09c1
//! keyroute card create --identity email:alice@example.com --public-key alice.pub
//! keyroute card revoke 3f2a09c1 --reason compromised
//! ```

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;

use keyroute_core::{Card, CardRequest, CardScope, RevocationReason, SearchCriteria};
use keyroute_resolve::{ArgumentIo, DirectoryService};
use serde::Serialize;
use tracing::info;

use super::describe::fingerprint;
use super::{CommandError, Report};
use crate::logging::redact_sensitive;

// ============================================================================
// CardSummary
// ============================================================================

/// A card as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
    /// Card id.
    pub id: String,
    /// Identity kind.
    pub identity_type: String,
    /// Identity value.
    pub identity: String,
    /// Visibility scope.
    pub scope: CardScope,
    /// Hex SHA-256 of the public key.
    pub fingerprint: String,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl CardSummary {
    /// Summarise `card`.
    ///
    /// # Errors
    ///
    /// Returns [`keyroute_core::ArgumentError::Parse`] if the card's key is
    /// not valid base64.
    pub fn from_card(card: &Card) -> Result<Self, CommandError> {
        Ok(Self {
            id: card.id.clone(),
            identity_type: card.identity_type.clone(),
            identity: card.identity.clone(),
            scope: card.scope,
            fingerprint: fingerprint(&card.public_key_bytes()?),
            created_at: card.created_at.to_rfc3339(),
        })
    }

    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "  - {} {}:{} ({}, sha256 {}, created {})",
            self.id, self.identity_type, self.identity, self.scope, self.fingerprint, self.created_at
        )
    }
}

fn log_application_token(token: Option<&str>) {
    if let Some(token) = token {
        info!(application_token = %redact_sensitive(token), "Using application token");
    }
}

// ============================================================================
// Search
// ============================================================================

/// Cards found for an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSearchReport {
    /// The searched identity as `type:value`.
    pub identity: String,
    /// The searched scope.
    pub scope: CardScope,
    /// Matching cards, oldest first.
    pub cards: Vec<CardSummary>,
}

impl Report for CardSearchReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.cards.is_empty() {
            return writeln!(out, "No cards found for {} in {} scope.", self.identity, self.scope);
        }
        writeln!(out, "Cards for {} ({} scope):", self.identity, self.scope)?;
        for card in &self.cards {
            card.write_text(out)?;
        }
        Ok(())
    }
}

/// The `keyroute card search` command handler.
#[derive(Clone)]
pub struct CardSearchCommand {
    directory: Arc<dyn DirectoryService>,
}

impl std::fmt::Debug for CardSearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardSearchCommand").finish_non_exhaustive()
    }
}

impl CardSearchCommand {
    /// A handler searching `directory`.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryService>) -> Self {
        Self { directory }
    }

    /// Search the directory.
    ///
    /// # Errors
    ///
    /// Returns an argument error for a malformed identity or scope, or a
    /// directory error if the search fails.
    pub fn run(&self, io: &mut ArgumentIo) -> Result<CardSearchReport, CommandError> {
        let identity = io.get_card_identity()?;
        let scope = io.get_card_scope()?;

        let criteria = SearchCriteria::new(scope, identity.key(), identity.value());
        let cards = self
            .directory
            .search_cards(&criteria)?
            .iter()
            .map(CardSummary::from_card)
            .collect::<Result<Vec<_>, _>>()?;

        info!(identity = %identity, %scope, found = cards.len(), "Searched cards");
        Ok(CardSearchReport {
            identity: identity.to_string(),
            scope,
            cards,
        })
    }
}

// ============================================================================
// Get
// ============================================================================

/// One card looked up by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardGetReport {
    /// The card.
    pub card: CardSummary,
    /// The card in transport form, importable with `vcard:`.
    pub exported: String,
}

impl Report for CardGetReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Card")?;
        self.card.write_text(out)?;
        writeln!(out, "  Exported: {}", self.exported)
    }
}

/// The `keyroute card get` command handler.
#[derive(Clone)]
pub struct CardGetCommand {
    directory: Arc<dyn DirectoryService>,
}

impl std::fmt::Debug for CardGetCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardGetCommand").finish_non_exhaustive()
    }
}

impl CardGetCommand {
    /// A handler reading from `directory`.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryService>) -> Self {
        Self { directory }
    }

    /// Look the card up.
    ///
    /// # Errors
    ///
    /// Returns [`keyroute_core::DirectoryError::NotFound`] if there is no
    /// such card.
    pub fn run(&self, io: &mut ArgumentIo) -> Result<CardGetReport, CommandError> {
        let id = io.get_card_id()?;
        let card = self.directory.get_card(&id)?;

        info!(id = %card.id, "Fetched card");
        Ok(CardGetReport {
            card: CardSummary::from_card(&card)?,
            exported: card.export_to_string()?,
        })
    }
}

// ============================================================================
// Create
// ============================================================================

/// A newly published card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardCreateReport {
    /// The card.
    pub card: CardSummary,
    /// The card in transport form, importable with `vcard:`.
    pub exported: String,
}

impl Report for CardCreateReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Created card")?;
        self.card.write_text(out)?;
        writeln!(out, "  Exported: {}", self.exported)
    }
}

/// The `keyroute card create` command handler.
#[derive(Clone)]
pub struct CardCreateCommand {
    directory: Arc<dyn DirectoryService>,
}

impl std::fmt::Debug for CardCreateCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardCreateCommand").finish_non_exhaustive()
    }
}

impl CardCreateCommand {
    /// A handler publishing to `directory`.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryService>) -> Self {
        Self { directory }
    }

    /// Publish the card.
    ///
    /// # Errors
    ///
    /// Returns an argument error for a malformed identity, scope or public
    /// key, or [`keyroute_core::DirectoryError::Conflict`] if the identity
    /// already has a card in that scope.
    pub fn run(&self, io: &mut ArgumentIo) -> Result<CardCreateReport, CommandError> {
        let identity = io.get_card_identity()?;
        let scope = io.get_card_scope()?;
        let public_key = io.get_public_key()?;
        log_application_token(io.get_application_token()?.as_deref());

        let request = CardRequest {
            identity: identity.value().to_string(),
            identity_type: identity.key().to_string(),
            scope,
            public_key,
            data: BTreeMap::new(),
        };
        let card = self.directory.create_card(&request)?;

        Ok(CardCreateReport {
            card: CardSummary::from_card(&card)?,
            exported: card.export_to_string()?,
        })
    }
}

// ============================================================================
// Revoke
// ============================================================================

/// A revoked card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRevokeReport {
    /// Card id.
    pub id: String,
    /// Why it was revoked.
    pub reason: RevocationReason,
}

impl Report for CardRevokeReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Revoked card {} ({})", self.id, self.reason.as_str())
    }
}

/// The `keyroute card revoke` command handler.
#[derive(Clone)]
pub struct CardRevokeCommand {
    directory: Arc<dyn DirectoryService>,
}

impl std::fmt::Debug for CardRevokeCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardRevokeCommand").finish_non_exhaustive()
    }
}

impl CardRevokeCommand {
    /// A handler revoking in `directory`.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryService>) -> Self {
        Self { directory }
    }

    /// Revoke the card.
    ///
    /// # Errors
    ///
    /// Returns [`keyroute_core::DirectoryError::NotFound`] if there is no
    /// such card.
    pub fn run(&self, io: &mut ArgumentIo) -> Result<CardRevokeReport, CommandError> {
        let id = io.get_card_id()?;
        let reason = io.get_revocation_reason()?;
        log_application_token(io.get_application_token()?.as_deref());

        self.directory.revoke_card(&id, reason)?;
        Ok(CardRevokeReport { id, reason })
    }
}
