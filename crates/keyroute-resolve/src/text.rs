//! Values taken literally.

use keyroute_args::ArgumentToken;
use keyroute_core::error::ArgumentResult;
use keyroute_core::{Card, Password};

use crate::resolver::{SourceKind, ValueResolver};

/// Uses the argument text itself.
///
/// Passwords are the literal value. Cards are read from `vcard:` tokens
/// whose value holds one exported card per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextResolver;

impl TextResolver {
    /// Create a text resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ValueResolver for TextResolver {
    fn name(&self) -> &str {
        "text"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Text
    }

    fn try_password(&self, value: &str) -> ArgumentResult<Option<Password>> {
        Ok(Some(Password::new(value)))
    }

    fn try_cards(&self, token: &ArgumentToken) -> ArgumentResult<Option<Vec<Card>>> {
        if token.key() != "vcard" {
            return Ok(None);
        }
        let cards = token
            .value()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Card::import_from_string)
            .collect::<ArgumentResult<Vec<_>>>()?;
        Ok(Some(cards))
    }
}
