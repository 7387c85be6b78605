//! Argument sources and the chain that searches them.
//!
//! A source answers "do you hold argument `name`?" ([`ArgumentSource::can_read`])
//! and "give me its values" ([`ArgumentSource::read`]). The
//! [`ArgumentSourceChain`] asks its sources in insertion order and returns
//! the first answer; values from different sources are never merged.
//!
//! # Standard Order
//!
//! 1. [`CommandLineSource`] - flags and positionals parsed by clap
//! 2. [`OverrideSource`] - `-D KEY=VALUE` pairs
//! 3. [`ConfigFileSource`] - the `[arguments]` table of the config file
//! 4. [`DefaultsSource`] - built-in defaults
//! 5. [`InteractiveSource`] - prompts, when the rules allow it
//!
//! # Initialisation
//!
//! [`ArgumentSourceChain::init`] runs [`ArgumentSource::init`] on every
//! source front to back, then [`ArgumentSource::update_rules`] back to front
//! so that earlier sources override later ones. The resulting
//! [`ArgumentRules`] are frozen and handed to every source.
//!
//! ```
//! use keyroute_args::source::{ArgumentSourceChain, DefaultsSource};
//! use keyroute_args::{ArgumentImportance, ControlFlow};
//!
//! let mut chain = ArgumentSourceChain::new()
//!     .with(DefaultsSource::new().with("algorithm", "ed25519"));
//! assert_eq!(chain.init().expect("init"), ControlFlow::Value(()));
//!
//! let algorithm = chain.read_string("algorithm", ArgumentImportance::Required).expect("default");
//! assert_eq!(algorithm, "ed25519");
//! assert!(chain.read("missing", ArgumentImportance::Required).is_err());
//! assert!(chain.read("missing", ArgumentImportance::Optional).expect("optional").is_empty());
//! ```

mod command_line;
mod config_file;
mod defaults;
mod interactive;
mod overrides;

pub use command_line::CommandLineSource;
pub use config_file::ConfigFileSource;
pub use defaults::DefaultsSource;
pub use interactive::InteractiveSource;
pub use overrides::{split_overrides, OverrideSource};

use std::sync::Arc;

use keyroute_core::error::{ArgumentError, ArgumentResult};
use tracing::{debug, info};

use crate::importance::ArgumentImportance;
use crate::rules::{flag_of, names, ArgumentRules, ControlFlow};
use crate::value::{Argument, ArgumentValue};

/// A place argument values come from.
pub trait ArgumentSource {
    /// Source name for logs, e.g. `command line`.
    fn name(&self) -> &str;

    /// Prepare the source. Runs once, before any read.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Parse`] if the source's input is malformed.
    fn init(&mut self) -> ArgumentResult<ControlFlow<()>> {
        Ok(ControlFlow::Value(()))
    }

    /// Contribute to the shared rules. Called back to front after every
    /// source is initialised.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule argument has an unusable value.
    fn update_rules(&mut self, _rules: &mut ArgumentRules) -> ArgumentResult<()> {
        Ok(())
    }

    /// Receive the frozen rules.
    fn set_rules(&mut self, _rules: Arc<ArgumentRules>) {}

    /// Returns `true` if this source holds `name`. Has no side effects.
    fn can_read(&self, name: &str, importance: ArgumentImportance) -> bool;

    /// Read the values of `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce the values.
    fn read(&mut self, name: &str) -> ArgumentResult<Argument>;

    /// Read `name` as a list of values.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce the values.
    fn read_list(&mut self, name: &str) -> ArgumentResult<Argument> {
        self.read(name)
    }

    /// Read `name` as a yes/no flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce the value.
    fn read_flag(&mut self, name: &str) -> ArgumentResult<Argument> {
        self.read(name)
    }

    /// Usage text to show after an error, if this source has one.
    fn usage(&self) -> Option<String> {
        None
    }
}

/// Apply `--interactive`, `--interactive-optional` and `--quiet` from
/// `source` to `rules`. Arguments the source does not hold leave the rules
/// unchanged.
pub(crate) fn apply_rule_flags<S>(source: &mut S, rules: &mut ArgumentRules) -> ArgumentResult<()>
where
    S: ArgumentSource + ?Sized,
{
    let optional = ArgumentImportance::Optional;
    if source.can_read(names::INTERACTIVE, optional) {
        rules.allow_interactive = flag_of(&source.read_flag(names::INTERACTIVE)?)?;
    }
    if source.can_read(names::INTERACTIVE_OPTIONAL, optional) {
        rules.allow_interactive_for_optional =
            flag_of(&source.read_flag(names::INTERACTIVE_OPTIONAL)?)?;
    }
    if source.can_read(names::QUIET, optional) && flag_of(&source.read_flag(names::QUIET)?)? {
        rules.allow_interactive = false;
        rules.allow_interactive_for_optional = false;
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum ReadShape {
    Value,
    List,
    Flag,
}

/// Ordered sources, first match wins.
#[derive(Default)]
pub struct ArgumentSourceChain {
    sources: Vec<Box<dyn ArgumentSource>>,
    rules: Arc<ArgumentRules>,
}

impl ArgumentSourceChain {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with the lowest priority so far.
    #[must_use]
    pub fn with(mut self, source: impl ArgumentSource + 'static) -> Self {
        self.add(Box::new(source));
        self
    }

    /// Append a source with the lowest priority so far.
    pub fn add(&mut self, source: Box<dyn ArgumentSource>) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Source names in priority order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// The rules in effect. Defaults until [`Self::init`] has run.
    #[must_use]
    pub fn rules(&self) -> &ArgumentRules {
        &self.rules
    }

    /// The first usage text any source offers.
    #[must_use]
    pub fn usage(&self) -> Option<String> {
        self.sources.iter().find_map(|source| source.usage())
    }

    /// Initialise every source and freeze the rules.
    ///
    /// Stops at the first source asking to show usage or version.
    ///
    /// # Errors
    ///
    /// Returns the first initialisation or rule error.
    pub fn init(&mut self) -> ArgumentResult<ControlFlow<()>> {
        for source in &mut self.sources {
            debug!(source = source.name(), "Initialise argument source");
            match source.init()? {
                ControlFlow::Value(()) => {}
                other => return Ok(other),
            }
        }

        let mut rules = ArgumentRules::default();
        for source in self.sources.iter_mut().rev() {
            source.update_rules(&mut rules)?;
        }
        debug!(
            allow_interactive = rules.allow_interactive,
            allow_interactive_for_optional = rules.allow_interactive_for_optional,
            "Argument rules"
        );

        self.rules = Arc::new(rules);
        for source in &mut self.sources {
            source.set_rules(Arc::clone(&self.rules));
        }
        Ok(ControlFlow::Value(()))
    }

    /// Read `name` from the first source holding it.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::NotFound`] if `name` is required and no
    /// source holds it, or the error of the answering source.
    pub fn read(&mut self, name: &str, importance: ArgumentImportance) -> ArgumentResult<Argument> {
        self.read_shaped(name, importance, ReadShape::Value)
    }

    /// Read `name` as a list from the first source holding it.
    ///
    /// # Errors
    ///
    /// See [`Self::read`].
    pub fn read_list(
        &mut self,
        name: &str,
        importance: ArgumentImportance,
    ) -> ArgumentResult<Argument> {
        self.read_shaped(name, importance, ReadShape::List)
    }

    /// Read the first of `names` any source holds.
    ///
    /// Every name is read as optional, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::NotFound`] naming all of `names` if the read
    /// is required and none is held.
    pub fn read_any(
        &mut self,
        names: &[&str],
        importance: ArgumentImportance,
    ) -> ArgumentResult<Argument> {
        for name in names {
            let argument = self.read(name, ArgumentImportance::Optional)?;
            if !argument.is_empty() {
                return Ok(argument);
            }
        }
        match importance {
            ArgumentImportance::Required => Err(ArgumentError::not_found(format!(
                "{{{}}}",
                names.join(", ")
            ))),
            ArgumentImportance::Optional => Ok(Argument::empty()),
        }
    }

    /// Read a single value as text. An absent optional argument is empty.
    ///
    /// # Errors
    ///
    /// See [`Self::read`]. Also fails if several values are held.
    pub fn read_string(
        &mut self,
        name: &str,
        importance: ArgumentImportance,
    ) -> ArgumentResult<String> {
        let argument = self.read(name, importance)?;
        if argument.is_empty() {
            return Ok(String::new());
        }
        Ok(argument.as_value()?.to_string())
    }

    /// Read an optional flag. An absent flag is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::TypeMismatch`] if the value is not flag-like.
    pub fn read_bool(&mut self, name: &str) -> ArgumentResult<bool> {
        let argument = self.read_shaped(name, ArgumentImportance::Optional, ReadShape::Flag)?;
        flag_of(&argument)
    }

    /// Read a single number. An absent optional argument is `None`.
    ///
    /// # Errors
    ///
    /// See [`Self::read`]. Also fails if the value is not a number.
    pub fn read_number(
        &mut self,
        name: &str,
        importance: ArgumentImportance,
    ) -> ArgumentResult<Option<i64>> {
        let argument = self.read(name, importance)?;
        if argument.is_empty() {
            return Ok(None);
        }
        match argument.as_value()? {
            ArgumentValue::String(text) => text
                .parse()
                .map(Some)
                .map_err(|_| ArgumentError::value(name, text.as_str())),
            value => value.as_number().map(Some),
        }
    }

    fn read_shaped(
        &mut self,
        name: &str,
        importance: ArgumentImportance,
        shape: ReadShape,
    ) -> ArgumentResult<Argument> {
        debug!(argument = name, %importance, "Search source for argument");
        for source in &mut self.sources {
            debug!(argument = name, source = source.name(), "Ask source");
            if !source.can_read(name, importance) {
                continue;
            }
            let argument = match shape {
                ReadShape::Value => source.read(name)?,
                ReadShape::List => source.read_list(name)?,
                ReadShape::Flag => source.read_flag(name)?,
            };
            info!(
                argument = name,
                source = source.name(),
                kinds = ?argument.kinds(),
                "Argument found"
            );
            return Ok(argument);
        }

        match importance {
            ArgumentImportance::Required => Err(ArgumentError::not_found(name)),
            ArgumentImportance::Optional => {
                debug!(argument = name, "Optional argument not found");
                Ok(Argument::empty())
            }
        }
    }
}

impl std::fmt::Debug for ArgumentSourceChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentSourceChain")
            .field("sources", &self.source_names())
            .field("rules", &self.rules)
            .finish()
    }
}
