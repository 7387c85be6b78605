//! `-D KEY=VALUE` overrides.
//!
//! Overrides let any argument be set from the command line without a
//! dedicated flag, e.g. `-D no-password=true` or
//! `-D recipient-id=email:alice@example.com`. Repeating a key builds a list.

use std::collections::BTreeMap;

use keyroute_core::error::{ArgumentError, ArgumentResult};

use super::{apply_rule_flags, ArgumentSource};
use crate::importance::ArgumentImportance;
use crate::rules::{ArgumentRules, ControlFlow};
use crate::value::{Argument, ArgumentValue};

const SHORT: &str = "-D";
const LONG: &str = "--define";

/// Remove override pairs from `args`.
///
/// Recognises `-D KEY=VALUE`, `-DKEY=VALUE`, `--define KEY=VALUE` and
/// `--define=KEY=VALUE`. Everything after `--` is left alone, as is a
/// trailing `-D` without a value so the parser can report it.
///
/// Returns the remaining arguments and the pairs, in order.
///
/// # Examples
///
/// ```
/// use keyroute_args::source::split_overrides;
///
/// let (rest, pairs) = split_overrides(
///     ["keyroute", "-D", "a=1", "encrypt", "-Db=2", "--define=c=3"].map(String::from),
/// );
/// assert_eq!(rest, ["keyroute", "encrypt"]);
/// assert_eq!(pairs, ["a=1", "b=2", "c=3"]);
/// ```
pub fn split_overrides<I>(args: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = String>,
{
    let mut rest = Vec::new();
    let mut pairs = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--" {
            rest.push(arg);
            rest.extend(args.by_ref());
            break;
        }
        if arg == SHORT || arg == LONG {
            match args.next() {
                Some(pair) => pairs.push(pair),
                None => rest.push(arg),
            }
        } else if let Some(pair) = arg
            .strip_prefix(&format!("{LONG}="))
            .or_else(|| arg.strip_prefix(SHORT).filter(|p| !p.is_empty()))
        {
            pairs.push(pair.to_string());
        } else {
            rest.push(arg);
        }
    }
    (rest, pairs)
}

/// Arguments set with `-D KEY=VALUE`.
///
/// Values are kept as the text that was typed, so `007` stays `007`.
/// Flag and number reads accept text.
#[derive(Debug, Clone, Default)]
pub struct OverrideSource {
    pairs: Vec<String>,
    values: BTreeMap<String, Vec<ArgumentValue>>,
}

impl OverrideSource {
    /// A source for the given `KEY=VALUE` pairs. They are parsed in `init`.
    #[must_use]
    pub fn new(pairs: Vec<String>) -> Self {
        Self {
            pairs,
            values: BTreeMap::new(),
        }
    }
}

impl ArgumentSource for OverrideSource {
    fn name(&self) -> &str {
        "overrides"
    }

    fn init(&mut self) -> ArgumentResult<ControlFlow<()>> {
        for pair in &self.pairs {
            let (key, value) = pair
                .split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| {
                    ArgumentError::parse(format!(
                        "Invalid override '{pair}'. Expected 'KEY=VALUE'."
                    ))
                })?;
            self.values
                .entry(key.to_string())
                .or_default()
                .push(ArgumentValue::from(value));
        }
        Ok(ControlFlow::Value(()))
    }

    fn update_rules(&mut self, rules: &mut ArgumentRules) -> ArgumentResult<()> {
        apply_rule_flags(self, rules)
    }

    fn can_read(&self, name: &str, _importance: ArgumentImportance) -> bool {
        self.values.contains_key(name)
    }

    fn read(&mut self, name: &str) -> ArgumentResult<Argument> {
        self.values
            .get(name)
            .map(|values| Argument::from_values(values.clone()))
            .ok_or_else(|| ArgumentError::not_found(name))
    }
}
