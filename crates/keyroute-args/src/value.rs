//! Argument values.
//!
//! Every source returns an [`Argument`]: the list of [`ArgumentValue`]s it
//! holds for one name. Values arrive as raw strings, booleans or numbers;
//! [`ArgumentValue::parse`] re-derives the key-value shapes from the origin
//! string when a caller needs them.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use keyroute_core::error::{ArgumentError, ArgumentResult};

use crate::token::{split_parts, ArgumentToken};

/// One value of an argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArgumentValue {
    /// No value.
    #[default]
    Empty,
    /// A flag or boolean setting.
    Boolean(bool),
    /// A counter or integer setting.
    Number(i64),
    /// Free text.
    String(String),
    /// A `key:value` token.
    KeyValue {
        /// The text the token was parsed from.
        origin: String,
        /// The parsed token.
        token: ArgumentToken,
    },
    /// A `key:value:alias` token.
    KeyValueAlias {
        /// The text the token was parsed from.
        origin: String,
        /// The parsed token.
        token: ArgumentToken,
    },
}

impl ArgumentValue {
    /// Infer a value from text: `true`/`false` become booleans, integers
    /// become numbers, everything else is parsed as text or a token.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyroute_args::ArgumentValue;
    ///
    /// assert_eq!(ArgumentValue::infer("true"), ArgumentValue::Boolean(true));
    /// assert_eq!(ArgumentValue::infer("-3"), ArgumentValue::Number(-3));
    /// assert_eq!(ArgumentValue::infer("email:a@b.c").kind_name(), "KeyValue");
    /// assert_eq!(ArgumentValue::infer("plain.txt").kind_name(), "String");
    /// ```
    #[must_use]
    pub fn infer(text: &str) -> Self {
        match text {
            "" => Self::Empty,
            "true" => Self::Boolean(true),
            "false" => Self::Boolean(false),
            _ => text
                .parse::<i64>()
                .map_or_else(|_| Self::parse_text(text), Self::Number),
        }
    }

    /// Re-derive the variant from the origin string.
    ///
    /// Text splitting into two parts becomes [`ArgumentValue::KeyValue`],
    /// three parts [`ArgumentValue::KeyValueAlias`]; anything else stays
    /// text. Booleans and numbers are returned unchanged, so parsing twice
    /// gives the same value as parsing once.
    #[must_use]
    pub fn parse(&self) -> Self {
        match self {
            Self::String(origin)
            | Self::KeyValue { origin, .. }
            | Self::KeyValueAlias { origin, .. } => Self::parse_text(origin),
            other => other.clone(),
        }
    }

    fn parse_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::Empty;
        }
        let token = match split_parts(text).as_slice() {
            [key, value] => ArgumentToken::new(*key, *value, "").ok(),
            [key, value, alias] => ArgumentToken::new(*key, *value, *alias).ok(),
            _ => None,
        };
        match token {
            Some(token) if token.has_alias() => Self::KeyValueAlias {
                origin: text.to_string(),
                token,
            },
            Some(token) => Self::KeyValue {
                origin: text.to_string(),
                token,
            },
            None => Self::String(text.to_string()),
        }
    }

    /// The variant name, used in type mismatch messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Boolean(_) => "Boolean",
            Self::Number(_) => "Number",
            Self::String(_) => "String",
            Self::KeyValue { .. } => "KeyValue",
            Self::KeyValueAlias { .. } => "KeyValueAlias",
        }
    }

    /// Returns `true` for [`ArgumentValue::Empty`] and empty text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::String(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Consume the value, returning its text. String buffers are moved,
    /// not copied.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::String(text)
            | Self::KeyValue { origin: text, .. }
            | Self::KeyValueAlias { origin: text, .. } => text,
            other => other.to_string(),
        }
    }

    /// The boolean held by a [`ArgumentValue::Boolean`].
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] for any other variant.
    pub fn as_bool(&self) -> ArgumentResult<bool> {
        match self {
            Self::Boolean(value) => Ok(*value),
            other => Err(ArgumentError::type_mismatch("Boolean", other.kind_name())),
        }
    }

    /// The value as an optional flag.
    ///
    /// `Number(n)` counts as `n > 0` and `Empty` as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] for text and tokens.
    pub fn as_optional_bool(&self) -> ArgumentResult<bool> {
        match self {
            Self::Boolean(value) => Ok(*value),
            Self::Number(value) => Ok(*value > 0),
            Self::Empty => Ok(false),
            other => Err(ArgumentError::type_mismatch("Boolean", other.kind_name())),
        }
    }

    /// The number held by a [`ArgumentValue::Number`].
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] for any other variant.
    pub fn as_number(&self) -> ArgumentResult<i64> {
        match self {
            Self::Number(value) => Ok(*value),
            other => Err(ArgumentError::type_mismatch("Number", other.kind_name())),
        }
    }

    /// The text held by a [`ArgumentValue::String`].
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] for any other variant.
    pub fn as_str(&self) -> ArgumentResult<&str> {
        match self {
            Self::String(value) => Ok(value),
            other => Err(ArgumentError::type_mismatch("String", other.kind_name())),
        }
    }

    /// The token held by a [`ArgumentValue::KeyValue`].
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] for any other variant.
    pub fn as_key_value(&self) -> ArgumentResult<&ArgumentToken> {
        match self {
            Self::KeyValue { token, .. } => Ok(token),
            other => Err(ArgumentError::type_mismatch("KeyValue", other.kind_name())),
        }
    }

    /// The token held by either key-value variant.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] for any other variant.
    pub fn as_token(&self) -> ArgumentResult<&ArgumentToken> {
        match self {
            Self::KeyValue { token, .. } | Self::KeyValueAlias { token, .. } => Ok(token),
            other => Err(ArgumentError::type_mismatch(
                "KeyValueAlias",
                other.kind_name(),
            )),
        }
    }

    /// Text safe to log: tokens are rendered with secrets masked.
    #[must_use]
    pub fn masked(&self) -> String {
        match self {
            Self::KeyValue { token, .. } | Self::KeyValueAlias { token, .. } => token.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::KeyValue { origin, .. } | Self::KeyValueAlias { origin, .. } => {
                f.write_str(origin)
            }
        }
    }
}

impl FromStr for ArgumentValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::infer(s))
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for ArgumentValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::String(value)
        }
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

// ============================================================================
// Argument
// ============================================================================

/// All values one source holds for one argument name.
///
/// # Examples
///
/// ```
/// use keyroute_args::{Argument, ArgumentValue};
///
/// let argument = Argument::from(vec!["email:a@b.c".to_string(), "vcard:bob.vcard".to_string()]);
/// assert!(argument.is_list());
/// assert!(!argument.is_value());
///
/// let parsed = argument.parse();
/// assert!(parsed.as_list().iter().all(|v| v.as_token().is_ok()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argument {
    values: Vec<ArgumentValue>,
}

impl Argument {
    /// An argument with no values.
    #[must_use]
    pub const fn empty() -> Self {
        Self { values: Vec::new() }
    }

    /// An argument holding the given values.
    #[must_use]
    pub fn from_values(values: Vec<ArgumentValue>) -> Self {
        Self { values }
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if there is exactly one value.
    #[must_use]
    pub fn is_value(&self) -> bool {
        self.values.len() == 1
    }

    /// Returns `true` if there is at least one value.
    #[must_use]
    pub fn is_list(&self) -> bool {
        !self.values.is_empty()
    }

    /// The single value.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] unless there is exactly one
    /// value.
    pub fn as_value(&self) -> ArgumentResult<&ArgumentValue> {
        match self.values.as_slice() {
            [value] => Ok(value),
            [] => Err(ArgumentError::type_mismatch("Value", "Empty")),
            _ => Err(ArgumentError::type_mismatch("Value", "List")),
        }
    }

    /// Consume the argument, returning its single value.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] unless there is exactly one
    /// value.
    pub fn into_value(mut self) -> ArgumentResult<ArgumentValue> {
        match self.values.len() {
            1 => Ok(self.values.remove(0)),
            0 => Err(ArgumentError::type_mismatch("Value", "Empty")),
            _ => Err(ArgumentError::type_mismatch("Value", "List")),
        }
    }

    /// All values.
    #[must_use]
    pub fn as_list(&self) -> &[ArgumentValue] {
        &self.values
    }

    /// Consume the argument, returning its values.
    #[must_use]
    pub fn into_list(self) -> Vec<ArgumentValue> {
        self.values
    }

    /// Parse every value, see [`ArgumentValue::parse`].
    #[must_use]
    pub fn parse(&self) -> Self {
        Self {
            values: self.values.iter().map(ArgumentValue::parse).collect(),
        }
    }

    /// The value kinds, safe to log.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.values.iter().map(ArgumentValue::kind_name).collect()
    }
}

impl From<ArgumentValue> for Argument {
    fn from(value: ArgumentValue) -> Self {
        Self {
            values: vec![value],
        }
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Self::from(ArgumentValue::from(value))
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Self::from(ArgumentValue::from(value))
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::from(ArgumentValue::from(value))
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::from(ArgumentValue::from(value))
    }
}

impl From<Vec<String>> for Argument {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().map(ArgumentValue::from).collect()
    }
}

impl FromIterator<ArgumentValue> for Argument {
    fn from_iter<I: IntoIterator<Item = ArgumentValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
