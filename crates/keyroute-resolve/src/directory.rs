//! The card directory.
//!
//! [`DirectoryService`] is the seam to wherever cards are published. The
//! default [`LocalCardDirectory`] keeps one JSON file per card under
//! `~/.keyroute/cards`; revoked cards move to a `revoked/` subdirectory.
//!
//! [`DirectoryResolver`] exposes a directory to the value resolution chain.
//! It treats "not found" and empty results as a decline, so resolution can
//! fall through to local resolvers, and reports structural failures as
//! errors.
//!
//! # Token Forms
//!
//! | Token | Lookup |
//! |-------|--------|
//! | `vcard:<card-id>` or `id:<card-id>` | the card with that id |
//! | `private:<type>:<identity>` | application scope only |
//! | `<type>:<identity>` | global and application scope, merged |

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use keyroute_args::ArgumentToken;
use keyroute_core::encoding::encode_base64;
use keyroute_core::error::{ArgumentResult, DirectoryError, DirectoryResult};
use keyroute_core::{Card, CardRequest, CardScope, RevocationReason, SearchCriteria};
use tracing::{debug, info, warn};

use crate::resolver::{SourceKind, ValueResolver};

/// Subdirectory holding revoked cards.
const REVOKED_DIR: &str = "revoked";

/// Where cards are published and looked up.
pub trait DirectoryService: Send + Sync {
    /// Cards matching `criteria`. No match is an empty list.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError`] if the directory cannot be searched.
    fn search_cards(&self, criteria: &SearchCriteria) -> DirectoryResult<Vec<Card>>;

    /// The card with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] if there is no such card.
    fn get_card(&self, id: &str) -> DirectoryResult<Card>;

    /// Publish a new card.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Conflict`] if a card for the same identity
    /// and scope exists.
    fn create_card(&self, request: &CardRequest) -> DirectoryResult<Card>;

    /// Revoke the card with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] if there is no such card.
    fn revoke_card(&self, id: &str, reason: RevocationReason) -> DirectoryResult<()>;
}

// ============================================================================
// LocalCardDirectory
// ============================================================================

/// A directory stored as JSON files on disk.
#[derive(Debug, Clone)]
pub struct LocalCardDirectory {
    root: PathBuf,
}

impl LocalCardDirectory {
    /// A directory rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn card_path(&self, id: &str) -> DirectoryResult<PathBuf> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DirectoryError::not_found(id));
        }
        Ok(self.root.join(format!("{id}.json")))
    }

    fn read_card(path: &Path, id: &str) -> DirectoryResult<Card> {
        let content = fs::read_to_string(path)
            .map_err(|e| DirectoryError::io(format!("failed to read {}", path.display()), e))?;
        serde_json::from_str(&content).map_err(|e| DirectoryError::malformed(id, e.to_string()))
    }

    fn write_card(path: &Path, card: &Card) -> DirectoryResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DirectoryError::io(format!("failed to create {}", parent.display()), e)
            })?;
        }
        let json = serde_json::to_string_pretty(card)
            .map_err(|e| DirectoryError::malformed(card.id.as_str(), e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| DirectoryError::io(format!("failed to write {}", path.display()), e))
    }

    fn all_cards(&self) -> DirectoryResult<Vec<Card>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.root).map_err(|e| {
            DirectoryError::io(format!("failed to list {}", self.root.display()), e)
        })?;

        let mut cards = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| DirectoryError::io(format!("failed to list {}", self.root.display()), e))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            cards.push(Self::read_card(&path, &id)?);
        }
        cards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(cards)
    }

    fn new_id() -> String {
        hex::encode(rand::random::<[u8; 16]>())
    }
}

impl DirectoryService for LocalCardDirectory {
    fn search_cards(&self, criteria: &SearchCriteria) -> DirectoryResult<Vec<Card>> {
        let cards: Vec<Card> = self
            .all_cards()?
            .into_iter()
            .filter(|card| criteria.matches(card))
            .collect();
        debug!(
            identity_type = %criteria.identity_type,
            scope = %criteria.scope,
            found = cards.len(),
            "Searched local card directory"
        );
        Ok(cards)
    }

    fn get_card(&self, id: &str) -> DirectoryResult<Card> {
        let path = self.card_path(id)?;
        if !path.is_file() {
            return Err(DirectoryError::not_found(id));
        }
        Self::read_card(&path, id)
    }

    fn create_card(&self, request: &CardRequest) -> DirectoryResult<Card> {
        let criteria =
            SearchCriteria::new(request.scope, &request.identity_type, &request.identity);
        if !self.search_cards(&criteria)?.is_empty() {
            return Err(DirectoryError::conflict(format!(
                "{}:{}",
                request.identity_type, request.identity
            )));
        }

        let card = Card {
            id: Self::new_id(),
            identity: request.identity.clone(),
            identity_type: request.identity_type.clone(),
            scope: request.scope,
            public_key: encode_base64(request.public_key.as_bytes()),
            data: request.data.clone(),
            created_at: Utc::now(),
        };
        Self::write_card(&self.card_path(&card.id)?, &card)?;
        info!(card_id = %card.id, scope = %card.scope, "Created card");
        Ok(card)
    }

    fn revoke_card(&self, id: &str, reason: RevocationReason) -> DirectoryResult<()> {
        let mut card = self.get_card(id)?;
        card.data
            .insert("revocation_reason".to_string(), reason.as_str().to_string());
        card.data
            .insert("revoked_at".to_string(), Utc::now().to_rfc3339());

        let revoked = self.root.join(REVOKED_DIR).join(format!("{id}.json"));
        Self::write_card(&revoked, &card)?;
        let path = self.card_path(id)?;
        fs::remove_file(&path)
            .map_err(|e| DirectoryError::io(format!("failed to remove {}", path.display()), e))?;
        info!(card_id = %id, reason = reason.as_str(), "Revoked card");
        Ok(())
    }
}

// ============================================================================
// DirectoryResolver
// ============================================================================

/// Resolves cards through a [`DirectoryService`].
#[derive(Clone)]
pub struct DirectoryResolver {
    directory: Arc<dyn DirectoryService>,
}

impl DirectoryResolver {
    /// A resolver over `directory`.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryService>) -> Self {
        Self { directory }
    }

    fn lookup(&self, token: &ArgumentToken) -> DirectoryResult<Vec<Card>> {
        match token.key() {
            "vcard" | "id" => self.directory.get_card(token.value()).map(|card| vec![card]),
            "private" if token.has_alias() => self.directory.search_cards(&SearchCriteria::new(
                CardScope::Application,
                token.value(),
                token.alias(),
            )),
            identity_type => {
                let mut cards = self.directory.search_cards(&SearchCriteria::new(
                    CardScope::Global,
                    identity_type,
                    token.value(),
                ))?;
                cards.extend(self.directory.search_cards(&SearchCriteria::new(
                    CardScope::Application,
                    identity_type,
                    token.value(),
                ))?);
                Ok(cards)
            }
        }
    }
}

impl std::fmt::Debug for DirectoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryResolver").finish_non_exhaustive()
    }
}

impl ValueResolver for DirectoryResolver {
    fn name(&self) -> &str {
        "directory"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Directory
    }

    fn try_cards(&self, token: &ArgumentToken) -> ArgumentResult<Option<Vec<Card>>> {
        info!("Loading cards...");
        match self.lookup(token) {
            Ok(cards) if cards.is_empty() => Ok(None),
            Ok(cards) => Ok(Some(cards)),
            Err(e) if e.is_not_found() => {
                debug!(token = %token, "Card not found in the directory");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load cards.");
                Err(e.into())
            }
        }
    }
}

// ============================================================================
// MockDirectory
// ============================================================================

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};

    use chrono::Utc;
    use keyroute_core::encoding::encode_base64;
    use keyroute_core::error::{DirectoryError, DirectoryResult};
    use keyroute_core::{Card, CardRequest, RevocationReason, SearchCriteria};

    use super::DirectoryService;

    /// An in-memory directory for tests.
    #[derive(Debug, Default)]
    pub struct MockDirectory {
        cards: Mutex<Vec<Card>>,
        broken: bool,
        calls: AtomicUsize,
    }

    impl MockDirectory {
        /// An empty directory.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A directory holding `cards`.
        #[must_use]
        pub fn with_cards(cards: Vec<Card>) -> Self {
            Self {
                cards: Mutex::new(cards),
                ..Self::default()
            }
        }

        /// A directory whose every call fails with a malformed-data error.
        #[must_use]
        pub fn broken() -> Self {
            Self {
                broken: true,
                ..Self::default()
            }
        }

        /// How many calls the directory has served.
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// A snapshot of the stored cards.
        #[must_use]
        pub fn cards(&self) -> Vec<Card> {
            self.cards.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        fn enter(&self) -> DirectoryResult<std::sync::MutexGuard<'_, Vec<Card>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(DirectoryError::malformed("mock", "directory unavailable"));
            }
            Ok(self.cards.lock().unwrap_or_else(PoisonError::into_inner))
        }
    }

    impl DirectoryService for MockDirectory {
        fn search_cards(&self, criteria: &SearchCriteria) -> DirectoryResult<Vec<Card>> {
            Ok(self
                .enter()?
                .iter()
                .filter(|card| criteria.matches(card))
                .cloned()
                .collect())
        }

        fn get_card(&self, id: &str) -> DirectoryResult<Card> {
            self.enter()?
                .iter()
                .find(|card| card.id == id)
                .cloned()
                .ok_or_else(|| DirectoryError::not_found(id))
        }

        fn create_card(&self, request: &CardRequest) -> DirectoryResult<Card> {
            let mut cards = self.enter()?;
            let card = Card {
                id: format!("mock-{}", cards.len() + 1),
                identity: request.identity.clone(),
                identity_type: request.identity_type.clone(),
                scope: request.scope,
                public_key: encode_base64(request.public_key.as_bytes()),
                data: request.data.clone(),
                created_at: Utc::now(),
            };
            cards.push(card.clone());
            Ok(card)
        }

        fn revoke_card(&self, id: &str, _reason: RevocationReason) -> DirectoryResult<()> {
            let mut cards = self.enter()?;
            let before = cards.len();
            cards.retain(|card| card.id != id);
            if cards.len() == before {
                return Err(DirectoryError::not_found(id));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockDirectory;
