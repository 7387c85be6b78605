//! Rules shared by every source, and the outcome of chain initialisation.

use keyroute_core::error::ArgumentResult;

use crate::value::Argument;

/// Reserved argument names read by the chain itself.
pub mod names {
    /// The subcommand path, e.g. `card create`.
    pub const COMMAND: &str = "command";
    /// Allows prompting for required arguments.
    pub const INTERACTIVE: &str = "interactive";
    /// Also allows prompting for optional arguments.
    pub const INTERACTIVE_OPTIONAL: &str = "interactive-optional";
    /// Suppresses prompting and lowers log output.
    pub const QUIET: &str = "quiet";
}

/// Rules derived from the sources once, after initialisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgumentRules {
    /// Prompt for required arguments no source provides.
    pub allow_interactive: bool,
    /// Prompt for optional arguments too.
    pub allow_interactive_for_optional: bool,
}

/// The outcome of initialising the source chain.
///
/// Help and version requests are not errors: the caller prints the text and
/// exits successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlFlow<T> {
    /// Arguments are ready.
    Value(T),
    /// Usage was requested; holds the rendered help.
    ShowUsage(String),
    /// Version was requested; holds the rendered version.
    ShowVersion(String),
}

impl<T> ControlFlow<T> {
    /// Returns `true` for [`ControlFlow::Value`].
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Map the value, keeping help and version requests.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ControlFlow<U> {
        match self {
            Self::Value(value) => ControlFlow::Value(f(value)),
            Self::ShowUsage(text) => ControlFlow::ShowUsage(text),
            Self::ShowVersion(text) => ControlFlow::ShowVersion(text),
        }
    }
}

/// Interpret an argument as a flag: empty is `false`.
///
/// # Errors
///
/// Returns [`keyroute_core::ArgumentError::TypeMismatch`] if the argument
/// holds several values or a value that is not flag-like.
pub fn flag_of(argument: &Argument) -> ArgumentResult<bool> {
    if argument.is_empty() {
        return Ok(false);
    }
    let value = argument.as_value()?;
    match value {
        crate::value::ArgumentValue::String(text) => match text.as_str() {
            "true" | "yes" => Ok(true),
            "false" | "no" => Ok(false),
            _ => value.as_optional_bool(),
        },
        other => other.as_optional_bool(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::value::ArgumentValue;

    #[test]
    fn test_default_rules_deny_prompting() {
        let rules = ArgumentRules::default();
        assert!(!rules.allow_interactive);
        assert!(!rules.allow_interactive_for_optional);
    }

    #[test]
    fn test_control_flow_map() {
        assert_eq!(ControlFlow::Value(2).map(|v| v * 2), ControlFlow::Value(4));
        let usage: ControlFlow<i32> = ControlFlow::ShowUsage("usage".into());
        assert_eq!(usage.map(|v| v * 2), ControlFlow::ShowUsage("usage".into()));
        assert!(!ControlFlow::<()>::ShowVersion("1.0".into()).is_value());
    }

    #[test]
    fn test_flag_of() {
        assert!(!flag_of(&Argument::empty()).unwrap());
        assert!(flag_of(&Argument::from(true)).unwrap());
        assert!(flag_of(&Argument::from(3_i64)).unwrap());
        assert!(flag_of(&Argument::from("yes")).unwrap());
        assert!(!flag_of(&Argument::from("false")).unwrap());
        assert!(flag_of(&Argument::from("sometimes")).is_err());
        assert!(flag_of(&Argument::from_values(vec![
            ArgumentValue::Boolean(true),
            ArgumentValue::Boolean(false)
        ]))
        .is_err());
    }
}
