//! # keyroute-args
//!
//! Argument values, validation and the argument source chain for keyroute.
//!
//! ## Internal Crate Warning
//!
//! **This crate is an internal implementation detail of `keyroute`.** The API
//! is unstable and may change without notice.
//!
//! ## Overview
//!
//! Commands never look at argv directly. They ask an
//! [`ArgumentSourceChain`] for an argument by name and importance, and the
//! chain answers from the first source that holds it: command line,
//! `-D` overrides, config file, built-in defaults, and finally the user.
//!
//! - [`token`] - `key:value[:alias]` tokens
//! - [`value`] - [`ArgumentValue`] and [`Argument`]
//! - [`validation`] - predicates over argument values
//! - [`source`] - the [`ArgumentSource`] trait, its implementations and the
//!   chain
//! - [`prompt`] - user input for the interactive source
//!
//! ## Example
//!
//! ```
//! use keyroute_args::source::{ArgumentSourceChain, DefaultsSource, OverrideSource};
//! use keyroute_args::validation::{self, Validation};
//! use keyroute_args::{ArgumentImportance, ControlFlow};
//!
//! let mut chain = ArgumentSourceChain::new()
//!     .with(OverrideSource::new(vec!["recipient-id=email:alice@example.com".into()]))
//!     .with(DefaultsSource::new().with("recipient-id", "password:fallback"));
//! assert_eq!(chain.init().expect("init"), ControlFlow::Value(()));
//!
//! let recipients = chain
//!     .read_list("recipient-id", ArgumentImportance::Required)
//!     .expect("found");
//! let kept = validation::is_token()
//!     .validate_list("recipient-id", recipients.parse(), ArgumentImportance::Required)
//!     .expect("valid");
//! assert_eq!(kept[0].as_token().expect("token").key(), "email");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod importance;
pub mod prompt;
pub mod rules;
pub mod source;
pub mod token;
pub mod validation;
pub mod value;

pub use importance::ArgumentImportance;
pub use prompt::{PromptService, TerminalPrompt};
pub use rules::{names, ArgumentRules, ControlFlow};
pub use source::{ArgumentSource, ArgumentSourceChain};
pub use token::ArgumentToken;
pub use validation::{Validation, ValidationResult};
pub use value::{Argument, ArgumentValue};

#[cfg(any(test, feature = "mock"))]
pub use prompt::ScriptedPrompt;
