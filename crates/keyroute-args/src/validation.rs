//! Argument validation.
//!
//! Validators implement [`Validation::validate_value`] for a single value and
//! inherit the argument-level rules:
//!
//! - [`Validation::try_validate`] expects exactly one value; an optional
//!   argument may be empty.
//! - [`Validation::try_validate_list`] expects one or more values. Empty
//!   entries fail a required list and are dropped from an optional one.
//!
//! Ordinary mismatches are reported as a failed [`ValidationResult`], never
//! as an error. [`ValidationResult::into_result`] turns a failure into
//! [`ArgumentError::Validation`] at the call site.
//!
//! # Example
//!
//! ```
//! use keyroute_args::validation::{self, Validation};
//! use keyroute_args::{Argument, ArgumentImportance};
//!
//! let algorithms = validation::is_enum(&["ed25519", "rsa4096"]);
//! let result = algorithms.try_validate(&Argument::from("dsa"), ArgumentImportance::Required);
//! assert_eq!(
//!     result.message(),
//!     Some("Expected one of the values {ed25519, rsa4096}, but got 'dsa'.")
//! );
//! ```

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use keyroute_core::error::{ArgumentError, ArgumentResult};

use crate::importance::ArgumentImportance;
use crate::value::{Argument, ArgumentValue};

// ============================================================================
// ValidationResult
// ============================================================================

/// Outcome of a validation: success, or failure with a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ValidationResult {
    failure: Option<String>,
}

impl ValidationResult {
    /// A successful result.
    pub const fn success() -> Self {
        Self { failure: None }
    }

    /// A failed result.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }

    /// Returns `true` on success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// The failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Prefix the failure message. Successes are unchanged.
    pub fn prepend(self, prefix: &str) -> Self {
        Self {
            failure: self.failure.map(|message| format!("{prefix}{message}")),
        }
    }

    /// Suffix the failure message. Successes are unchanged.
    pub fn append(self, suffix: &str) -> Self {
        Self {
            failure: self.failure.map(|message| format!("{message}{suffix}")),
        }
    }

    /// Convert into a `Result` for the argument `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Validation`] if this is a failure.
    pub fn into_result(self, name: &str) -> ArgumentResult<()> {
        match self.failure {
            None => Ok(()),
            Some(message) => Err(ArgumentError::validation(name, message)),
        }
    }
}

impl Add for ValidationResult {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self.failure, rhs.failure) {
            (None, None) => Self::success(),
            (Some(lhs), Some(rhs)) => Self::failure(format!("{lhs} {rhs}")),
            (Some(message), None) | (None, Some(message)) => Self::failure(message),
        }
    }
}

impl AddAssign for ValidationResult {
    fn add_assign(&mut self, rhs: Self) {
        *self = std::mem::take(self) + rhs;
    }
}

/// Result of validating a list: the entries kept and the combined outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListValidation {
    /// Entries that were validated. Dropped empty entries are not included.
    pub kept: Vec<ArgumentValue>,
    /// The combined result of every kept entry.
    pub result: ValidationResult,
}

// ============================================================================
// Validation trait
// ============================================================================

/// A predicate over argument values.
pub trait Validation: Send + Sync {
    /// Validate a single value.
    fn validate_value(&self, value: &ArgumentValue) -> ValidationResult;

    /// Validate an argument that must hold exactly one value.
    fn try_validate(&self, argument: &Argument, importance: ArgumentImportance) -> ValidationResult {
        match argument.as_list() {
            [] if importance.is_optional() => ValidationResult::success(),
            [] => ValidationResult::failure("Expected one argument, but got empty."),
            [value] if importance.is_optional() && value.is_empty() => {
                ValidationResult::success()
            }
            [value] => self.validate_value(value),
            _ => ValidationResult::failure("Expected one argument, but got more than one."),
        }
    }

    /// Validate an argument that holds one or more values.
    ///
    /// Every entry is checked; failures are combined rather than returned
    /// early, except that an empty entry in a required list fails at once.
    fn try_validate_list(&self, argument: Argument, importance: ArgumentImportance) -> ListValidation {
        let values = argument.into_list();
        if values.is_empty() {
            let result = if importance.is_required() {
                ValidationResult::failure("Expected one or more arguments, but got zero.")
            } else {
                ValidationResult::success()
            };
            return ListValidation {
                kept: Vec::new(),
                result,
            };
        }

        let mut kept = Vec::with_capacity(values.len());
        let mut result = ValidationResult::success();
        for value in values {
            if value.is_empty() {
                if importance.is_required() {
                    return ListValidation {
                        kept,
                        result: ValidationResult::failure("Met empty value in the arguments list."),
                    };
                }
                tracing::warn!("Met empty value in the arguments list, it is ignored.");
                continue;
            }
            result += self.validate_value(&value);
            kept.push(value);
        }
        ListValidation { kept, result }
    }

    /// Validate a single-value argument named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Validation`] on failure.
    fn validate(
        &self,
        name: &str,
        argument: &Argument,
        importance: ArgumentImportance,
    ) -> ArgumentResult<()> {
        self.try_validate(argument, importance).into_result(name)
    }

    /// Validate a list argument named `name`, returning the kept entries.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Validation`] on failure.
    fn validate_list(
        &self,
        name: &str,
        argument: Argument,
        importance: ArgumentImportance,
    ) -> ArgumentResult<Vec<ArgumentValue>> {
        let ListValidation { kept, result } = self.try_validate_list(argument, importance);
        result.into_result(name)?;
        Ok(kept)
    }
}

fn type_failure(expected: &str, value: &ArgumentValue) -> ValidationResult {
    ValidationResult::failure(format!(
        "Expected {expected}, but found value of the type {}.",
        value.kind_name()
    ))
}

// ============================================================================
// Validators
// ============================================================================

/// Accepts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl Validation for Any {
    fn validate_value(&self, _value: &ArgumentValue) -> ValidationResult {
        ValidationResult::success()
    }
}

/// Rejects empty values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl Validation for NotEmpty {
    fn validate_value(&self, value: &ArgumentValue) -> ValidationResult {
        if value.is_empty() {
            ValidationResult::failure("Expected non-empty value, but got empty.")
        } else {
            ValidationResult::success()
        }
    }
}

/// Accepts plain text only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl Validation for Text {
    fn validate_value(&self, value: &ArgumentValue) -> ValidationResult {
        match value {
            ArgumentValue::String(_) => ValidationResult::success(),
            other => type_failure("text", other),
        }
    }
}

/// Accepts booleans, or text spelling `true` / `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsBool;

impl Validation for IsBool {
    fn validate_value(&self, value: &ArgumentValue) -> ValidationResult {
        match value {
            ArgumentValue::Boolean(_) => ValidationResult::success(),
            ArgumentValue::String(text) if text.parse::<bool>().is_ok() => {
                ValidationResult::success()
            }
            other => type_failure("boolean", other),
        }
    }
}

/// Accepts numbers, or text spelling an integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNumber;

impl Validation for IsNumber {
    fn validate_value(&self, value: &ArgumentValue) -> ValidationResult {
        match number_of(value) {
            Some(_) => ValidationResult::success(),
            None => type_failure("number", value),
        }
    }
}

fn number_of(value: &ArgumentValue) -> Option<i64> {
    match value {
        ArgumentValue::Number(number) => Some(*number),
        ArgumentValue::String(text) => text.parse().ok(),
        _ => None,
    }
}

/// Accepts one of a fixed set of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOf {
    values: Vec<String>,
}

impl OneOf {
    /// The valid values rendered as `{a, b}`.
    #[must_use]
    pub fn format_values(&self) -> String {
        format!("{{{}}}", self.values.join(", "))
    }
}

impl Validation for OneOf {
    fn validate_value(&self, value: &ArgumentValue) -> ValidationResult {
        let ArgumentValue::String(text) = value else {
            return type_failure("enum string", value);
        };
        if self.values.iter().any(|valid| valid == text) {
            ValidationResult::success()
        } else {
            ValidationResult::failure(format!(
                "Expected one of the values {}, but got '{text}'.",
                self.format_values()
            ))
        }
    }
}

/// Accepts numbers within `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InRange {
    min: i64,
    max: i64,
}

impl Validation for InRange {
    fn validate_value(&self, value: &ArgumentValue) -> ValidationResult {
        let Some(number) = number_of(value) else {
            return type_failure("number", value);
        };
        if number < self.min {
            ValidationResult::failure(format!("Invalid range: {number} < {}.", self.min))
        } else if number > self.max {
            ValidationResult::failure(format!("Invalid range: {number} > {}.", self.max))
        } else {
            ValidationResult::success()
        }
    }
}

/// Whether a token may, must, or must not carry an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasRule {
    /// `key:value` only.
    Forbidden,
    /// `key:value` or `key:value:alias`.
    Allowed,
    /// `key:value:alias` only.
    Required,
}

/// Accepts key-value tokens, optionally checking the key and the value.
///
/// Values are parsed before checking, so raw text such as `email:a@b.c` is
/// accepted.
pub struct KeyValueShape {
    alias: AliasRule,
    key_validation: Option<Box<dyn Validation>>,
    value_validations: BTreeMap<String, Box<dyn Validation>>,
}

impl KeyValueShape {
    /// A validator for the given alias rule.
    #[must_use]
    pub fn new(alias: AliasRule) -> Self {
        Self {
            alias,
            key_validation: None,
            value_validations: BTreeMap::new(),
        }
    }

    /// Check every token key with `validation`.
    #[must_use]
    pub fn with_key_validation(mut self, validation: impl Validation + 'static) -> Self {
        self.key_validation = Some(Box::new(validation));
        self
    }

    /// Check the value of tokens with key `key` with `validation`.
    #[must_use]
    pub fn with_value_validation(
        mut self,
        key: impl Into<String>,
        validation: impl Validation + 'static,
    ) -> Self {
        self.value_validations
            .insert(key.into(), Box::new(validation));
        self
    }

    fn check_shape(&self, value: &ArgumentValue) -> ValidationResult {
        match (self.alias, value) {
            (AliasRule::Forbidden, ArgumentValue::KeyValue { .. })
            | (AliasRule::Required, ArgumentValue::KeyValueAlias { .. })
            | (
                AliasRule::Allowed,
                ArgumentValue::KeyValue { .. } | ArgumentValue::KeyValueAlias { .. },
            ) => ValidationResult::success(),
            (AliasRule::Required, other) => type_failure("KeyValueAlias", other),
            (_, other) => type_failure("KeyValue", other),
        }
    }
}

impl std::fmt::Debug for KeyValueShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValueShape")
            .field("alias", &self.alias)
            .field("key_validation", &self.key_validation.is_some())
            .field("value_validations", &self.value_validations.keys())
            .finish()
    }
}

impl Validation for KeyValueShape {
    fn validate_value(&self, value: &ArgumentValue) -> ValidationResult {
        let parsed = value.parse();
        let shape = self.check_shape(&parsed);
        if !shape.is_success() {
            return shape;
        }
        let Ok(token) = parsed.as_token() else {
            return shape;
        };

        let key = self.key_validation.as_ref().map_or_else(ValidationResult::success, |v| {
            v.try_validate(&Argument::from(token.key()), ArgumentImportance::Required)
                .prepend("Key validation: ")
        });
        let value = self
            .value_validations
            .get(token.key())
            .map_or_else(ValidationResult::success, |v| {
                v.try_validate(&Argument::from(token.value()), ArgumentImportance::Required)
                    .prepend("Value validation: ")
            });
        key + value
    }
}

// ============================================================================
// Constructors
// ============================================================================

/// See [`Any`].
#[must_use]
pub const fn is_any() -> Any {
    Any
}

/// See [`NotEmpty`].
#[must_use]
pub const fn is_not_empty() -> NotEmpty {
    NotEmpty
}

/// See [`Text`].
#[must_use]
pub const fn is_text() -> Text {
    Text
}

/// See [`IsBool`].
#[must_use]
pub const fn is_bool() -> IsBool {
    IsBool
}

/// See [`IsNumber`].
#[must_use]
pub const fn is_number() -> IsNumber {
    IsNumber
}

/// See [`OneOf`].
#[must_use]
pub fn is_enum<S: AsRef<str>>(values: &[S]) -> OneOf {
    OneOf {
        values: values.iter().map(|v| v.as_ref().to_string()).collect(),
    }
}

/// See [`InRange`]. Returns `None` when `min > max`.
#[must_use]
pub const fn is_range(min: i64, max: i64) -> Option<InRange> {
    if min > max {
        None
    } else {
        Some(InRange { min, max })
    }
}

/// Tokens without alias, see [`KeyValueShape`].
#[must_use]
pub fn is_key_value() -> KeyValueShape {
    KeyValueShape::new(AliasRule::Forbidden)
}

/// Tokens with alias, see [`KeyValueShape`].
#[must_use]
pub fn is_key_value_alias() -> KeyValueShape {
    KeyValueShape::new(AliasRule::Required)
}

/// Tokens with or without alias, see [`KeyValueShape`].
#[must_use]
pub fn is_token() -> KeyValueShape {
    KeyValueShape::new(AliasRule::Allowed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use crate::importance::ArgumentImportance::{Optional, Required};

    fn list(values: &[&str]) -> Argument {
        values.iter().map(|v| ArgumentValue::from(*v)).collect()
    }

    // ------------------------------------------------------------------------
    // ValidationResult
    // ------------------------------------------------------------------------

    #[test]
    fn test_result_combination() {
        let ok = ValidationResult::success;
        let bad = ValidationResult::failure;
        assert!((ok() + ok()).is_success());
        assert_eq!((bad("a") + ok()).message(), Some("a"));
        assert_eq!((ok() + bad("b")).message(), Some("b"));
        assert_eq!((bad("a") + bad("b")).message(), Some("a b"));
    }

    #[test]
    fn test_result_decoration_only_on_failure() {
        assert!(ValidationResult::success().prepend("x").append("y").is_success());
        let failed = ValidationResult::failure("mid").prepend("<").append(">");
        assert_eq!(failed.message(), Some("<mid>"));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationResult::success().into_result("in").is_ok());
        let err = ValidationResult::failure("Bad.").into_result("in").unwrap_err();
        assert_eq!(err.to_string(), "Argument 'in' is invalid. Bad.");
    }

    // ------------------------------------------------------------------------
    // Single-value rules
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_optional_empty_passes() {
        assert!(is_not_empty().try_validate(&Argument::empty(), Optional).is_success());
        assert!(is_not_empty().try_validate(&Argument::from(""), Optional).is_success());
    }

    #[test]
    fn test_validate_required_empty_fails() {
        let result = is_any().try_validate(&Argument::empty(), Required);
        assert_eq!(result.message(), Some("Expected one argument, but got empty."));
    }

    #[test]
    fn test_validate_more_than_one_fails() {
        let result = is_any().try_validate(&list(&["a", "b"]), Optional);
        assert_eq!(
            result.message(),
            Some("Expected one argument, but got more than one.")
        );
    }

    // ------------------------------------------------------------------------
    // List rules
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_list_required_zero() {
        let outcome = is_any().try_validate_list(Argument::empty(), Required);
        assert_eq!(
            outcome.result.message(),
            Some("Expected one or more arguments, but got zero.")
        );
        assert!(is_any().try_validate_list(Argument::empty(), Optional).result.is_success());
    }

    #[test]
    fn test_validate_list_required_fails_on_empty_entry() {
        let outcome = is_token().try_validate_list(list(&["email:a@b.c", "", "pubkey:k"]), Required);
        assert_eq!(
            outcome.result.message(),
            Some("Met empty value in the arguments list.")
        );
    }

    #[test]
    fn test_validate_list_optional_drops_empty_entry() {
        let outcome = is_token().try_validate_list(list(&["email:a@b.c", "", "pubkey:k"]), Optional);
        assert!(outcome.result.is_success());
        assert_eq!(outcome.kept.len(), 2);
    }

    #[test]
    fn test_validate_list_combines_all_failures() {
        let outcome = is_enum(&["a"]).try_validate_list(list(&["x", "a", "y"]), Required);
        assert_eq!(
            outcome.result.message(),
            Some("Expected one of the values {a}, but got 'x'. Expected one of the values {a}, but got 'y'.")
        );
        assert_eq!(outcome.kept.len(), 3);
    }

    #[test]
    fn test_validate_list_error() {
        let err = is_any()
            .validate_list("recipient-id", Argument::empty(), Required)
            .unwrap_err();
        assert!(matches!(err, ArgumentError::Validation { ref name, .. } if name == "recipient-id"));
    }

    // ------------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------------

    #[test]
    fn test_enum_requires_string() {
        let result = is_enum(&["a"]).validate_value(&ArgumentValue::Number(1));
        assert_eq!(
            result.message(),
            Some("Expected enum string, but found value of the type Number.")
        );
    }

    #[test]
    fn test_range() {
        assert!(is_range(5, 1).is_none());
        let range = is_range(1, 5).unwrap();
        assert!(range.validate_value(&ArgumentValue::Number(3)).is_success());
        assert!(range.validate_value(&ArgumentValue::from("5")).is_success());
        assert_eq!(
            range.validate_value(&ArgumentValue::Number(0)).message(),
            Some("Invalid range: 0 < 1.")
        );
        assert_eq!(
            range.validate_value(&ArgumentValue::Number(9)).message(),
            Some("Invalid range: 9 > 5.")
        );
        assert_eq!(
            range.validate_value(&ArgumentValue::Boolean(true)).message(),
            Some("Expected number, but found value of the type Boolean.")
        );
    }

    #[test]
    fn test_bool_and_number() {
        assert!(is_bool().validate_value(&ArgumentValue::Boolean(false)).is_success());
        assert!(is_bool().validate_value(&ArgumentValue::from("true")).is_success());
        assert!(!is_bool().validate_value(&ArgumentValue::from("maybe")).is_success());
        assert!(is_number().validate_value(&ArgumentValue::from("-4")).is_success());
        assert!(!is_number().validate_value(&ArgumentValue::from("four")).is_success());
    }

    #[test]
    fn test_text_and_not_empty() {
        assert!(is_text().validate_value(&ArgumentValue::from("x")).is_success());
        assert!(!is_text().validate_value(&ArgumentValue::Number(1)).is_success());
        assert!(!is_not_empty().validate_value(&ArgumentValue::Empty).is_success());
    }

    #[test]
    fn test_key_value_shapes() {
        let kv = ArgumentValue::from("email:a@b.c");
        let kva = ArgumentValue::from("pubkey:k.pub:Bob");
        let text = ArgumentValue::from("plain");

        assert!(is_key_value().validate_value(&kv).is_success());
        assert!(!is_key_value().validate_value(&kva).is_success());
        assert!(is_key_value_alias().validate_value(&kva).is_success());
        assert!(!is_key_value_alias().validate_value(&kv).is_success());
        assert!(is_token().validate_value(&kv).is_success());
        assert!(is_token().validate_value(&kva).is_success());
        assert_eq!(
            is_token().validate_value(&text).message(),
            Some("Expected KeyValue, but found value of the type String.")
        );
    }

    #[test]
    fn test_key_value_nested_validation() {
        let validation = is_token()
            .with_key_validation(is_enum(&["email", "pubkey"]))
            .with_value_validation("pubkey", is_enum(&["k.pub"]));

        assert!(validation.validate_value(&ArgumentValue::from("email:x")).is_success());

        let result = validation.validate_value(&ArgumentValue::from("vcard:x"));
        assert_eq!(
            result.message(),
            Some("Key validation: Expected one of the values {email, pubkey}, but got 'vcard'.")
        );

        let result = validation.validate_value(&ArgumentValue::from("pubkey:other"));
        assert_eq!(
            result.message(),
            Some("Value validation: Expected one of the values {k.pub}, but got 'other'.")
        );
    }
}
