//! Key-value tokens.
//!
//! A token is the `key:value[:alias]` shape used by recipient and key
//! arguments, e.g. `email:alice@example.com`, `pubkey:bob.pub:Bob` or
//! `password=hunter2`. Both `:` and `=` delimit parts, and empty parts
//! produced by adjacent delimiters are skipped, so `email::a@b.c` is the same
//! token as `email:a@b.c`.

use std::fmt;

use keyroute_core::error::{ArgumentError, ArgumentResult};

/// Keys whose value is never printed.
const MASKED_KEYS: [&str; 2] = ["password", "privkey"];

/// Placeholder shown instead of a masked value.
const HIDDEN: &str = "<hidden>";

/// Split `raw` on `:` and `=`, skipping empty parts.
pub(crate) fn split_parts(raw: &str) -> Vec<&str> {
    raw.split(|c| c == ':' || c == '=')
        .filter(|part| !part.is_empty())
        .collect()
}

/// A parsed `key:value[:alias]` token.
///
/// The key and value are never empty. The alias is empty when the token has
/// only two parts.
///
/// # Examples
///
/// ```
/// use keyroute_args::ArgumentToken;
///
/// let token = ArgumentToken::parse("pubkey:bob.pub:Bob").expect("valid token");
/// assert_eq!(token.key(), "pubkey");
/// assert_eq!(token.value(), "bob.pub");
/// assert_eq!(token.alias(), "Bob");
///
/// let secret = ArgumentToken::parse("password=hunter2").expect("valid token");
/// assert_eq!(secret.to_string(), "password:<hidden>");
///
/// assert!(ArgumentToken::parse("nocolon").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgumentToken {
    key: String,
    value: String,
    alias: String,
}

impl ArgumentToken {
    /// Build a token from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidToken`] if `key` or `value` is empty.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        alias: impl Into<String>,
    ) -> ArgumentResult<Self> {
        let (key, value, alias) = (key.into(), value.into(), alias.into());
        if key.is_empty() || value.is_empty() {
            return Err(ArgumentError::invalid_token(format!("{key}:{value}")));
        }
        Ok(Self { key, value, alias })
    }

    /// Parse a token from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidToken`] unless the text splits into
    /// two or three non-empty parts.
    pub fn parse(raw: &str) -> ArgumentResult<Self> {
        match split_parts(raw).as_slice() {
            [key, value] => Self::new(*key, *value, ""),
            [key, value, alias] => Self::new(*key, *value, *alias),
            _ => Err(ArgumentError::invalid_token(raw)),
        }
    }

    /// The token key, e.g. `email`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The token value, e.g. `alice@example.com`.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The alias, or an empty string.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns `true` if the token carries an alias.
    #[must_use]
    pub fn has_alias(&self) -> bool {
        !self.alias.is_empty()
    }

    /// Returns `true` if the value is masked when displayed.
    #[must_use]
    pub fn is_masked(&self) -> bool {
        MASKED_KEYS.contains(&self.key.as_str())
    }
}

impl fmt::Display for ArgumentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.is_masked() { HIDDEN } else { &self.value };
        write!(f, "{}:{value}", self.key)?;
        if self.has_alias() {
            write!(f, ":{}", self.alias)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_two_parts() {
        let token = ArgumentToken::parse("email:alice@example.com").unwrap();
        assert_eq!(token.key(), "email");
        assert_eq!(token.value(), "alice@example.com");
        assert_eq!(token.alias(), "");
        assert!(!token.has_alias());
    }

    #[test]
    fn test_parse_three_parts_with_equals() {
        let token = ArgumentToken::parse("pubkey=bob.pub=Bob").unwrap();
        assert_eq!(token.key(), "pubkey");
        assert_eq!(token.value(), "bob.pub");
        assert_eq!(token.alias(), "Bob");
    }

    #[test]
    fn test_parse_skips_empty_parts() {
        let token = ArgumentToken::parse("email::alice@example.com:").unwrap();
        assert_eq!(token.key(), "email");
        assert_eq!(token.value(), "alice@example.com");
        assert_eq!(token.alias(), "");
    }

    #[test]
    fn test_parse_rejects_one_part() {
        let err = ArgumentToken::parse("nocolon").unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidToken { ref token } if token == "nocolon"));
    }

    #[test]
    fn test_parse_rejects_four_parts() {
        assert!(ArgumentToken::parse("a:b:c:d").is_err());
    }

    #[test]
    fn test_parse_rejects_only_delimiters() {
        assert!(ArgumentToken::parse(":=:").is_err());
        assert!(ArgumentToken::parse("").is_err());
    }

    #[test]
    fn test_new_rejects_empty_parts() {
        assert!(ArgumentToken::new("", "v", "").is_err());
        assert!(ArgumentToken::new("k", "", "").is_err());
        assert!(ArgumentToken::new("k", "v", "").is_ok());
    }

    #[test]
    fn test_display_masks_secrets() {
        let token = ArgumentToken::parse("privkey:alice.key:Alice").unwrap();
        assert_eq!(token.to_string(), "privkey:<hidden>:Alice");
        let token = ArgumentToken::parse("email:alice@example.com").unwrap();
        assert_eq!(token.to_string(), "email:alice@example.com");
    }

    proptest! {
        #[test]
        fn test_display_reparses_to_same_token(
            key in "[a-z]{1,8}",
            value in "[a-zA-Z0-9@._-]{1,16}",
            alias in "[a-zA-Z0-9]{0,8}",
        ) {
            prop_assume!(!MASKED_KEYS.contains(&key.as_str()));
            let token = ArgumentToken::new(key, value, alias).unwrap();
            let reparsed = ArgumentToken::parse(&token.to_string()).unwrap();
            prop_assert_eq!(reparsed, token);
        }
    }
}
