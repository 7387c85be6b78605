//! # keyroute
//!
//! Command-line front end for resolving encryption arguments: key pair
//! requests, encryption recipients, decryption credentials and card
//! directory operations.
//!
//! Every argument can come from the command line, a `-D KEY=VALUE`
//! override, the config file, a built-in default or an interactive
//! prompt, in that order. Recipient tokens such as `email:alice@example.com`
//! or `privkey:alice.key:alice` are resolved through files, literal values
//! and the card directory.
//!
//! ## Modules
//!
//! - [`app`] - argv to exit code
//! - [`cli`] - the clap grammar and command handlers
//! - [`logging`] - tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod app;
pub mod cli;
pub mod logging;

pub use app::{run, RunOptions};
pub use logging::{init_logging, LogConfig, LogError, LogFormat, LogGuard, LogLevel};
