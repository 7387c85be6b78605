//! Command-line interface: the clap grammar and the command handlers.

pub mod args;
pub mod commands;

pub use args::{CardCommands, Cli, Commands, KeyCommands};
