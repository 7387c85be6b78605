//! Command-line arguments parsed by clap.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::parser::{MatchesError, ValueSource};
use clap::{ArgMatches, Command};
use keyroute_core::error::{ArgumentError, ArgumentResult};

use super::{apply_rule_flags, ArgumentSource};
use crate::importance::ArgumentImportance;
use crate::rules::{names, ArgumentRules, ControlFlow};
use crate::value::Argument;

/// Arguments given on the command line.
///
/// The clap [`Command`] is the usage grammar. Values are looked up by arg id
/// in the matches of the deepest subcommand, where global args are visible
/// too. Only values the user actually typed are reported; clap defaults are
/// left to the lower-priority sources.
///
/// The reserved name [`names::COMMAND`] reads the subcommand path, e.g.
/// `card create`.
#[derive(Debug)]
pub struct CommandLineSource {
    command: Command,
    args: Vec<OsString>,
    matches: Option<ArgMatches>,
    path: Vec<String>,
    usage: Option<String>,
}

impl CommandLineSource {
    /// A source parsing `args` (including the binary name) with `command`.
    pub fn new<I, T>(command: Command, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            command,
            args: args.into_iter().map(Into::into).collect(),
            matches: None,
            path: Vec::new(),
            usage: None,
        }
    }

    /// The subcommand path, outermost first. Empty before `init`.
    #[must_use]
    pub fn command_path(&self) -> &[String] {
        &self.path
    }

    fn typed_on_command_line(matches: &ArgMatches, name: &str) -> bool {
        matches!(matches.try_contains_id(name), Ok(true))
            && matches.value_source(name) == Some(ValueSource::CommandLine)
    }

    fn read_matches(matches: &ArgMatches, name: &str) -> ArgumentResult<Argument> {
        match matches.try_get_many::<String>(name) {
            Ok(Some(values)) => Ok(Argument::from(values.cloned().collect::<Vec<_>>())),
            Ok(None) => Ok(Argument::empty()),
            Err(MatchesError::Downcast { .. }) => {
                if let Ok(Some(flag)) = matches.try_get_one::<bool>(name) {
                    Ok(Argument::from(*flag))
                } else if let Ok(Some(count)) = matches.try_get_one::<u8>(name) {
                    Ok(Argument::from(i64::from(*count)))
                } else {
                    Err(ArgumentError::parse(format!(
                        "Argument '{name}' has a value of an unsupported type."
                    )))
                }
            }
            Err(e) => Err(ArgumentError::parse(e.to_string())),
        }
    }
}

impl ArgumentSource for CommandLineSource {
    fn name(&self) -> &str {
        "command line"
    }

    fn init(&mut self) -> ArgumentResult<ControlFlow<()>> {
        self.usage = Some(self.command.render_usage().to_string());

        let matches = match self.command.clone().try_get_matches_from(&self.args) {
            Ok(matches) => matches,
            Err(e) => {
                return match e.kind() {
                    ErrorKind::DisplayHelp
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                        Ok(ControlFlow::ShowUsage(e.render().to_string()))
                    }
                    ErrorKind::DisplayVersion => {
                        Ok(ControlFlow::ShowVersion(e.render().to_string()))
                    }
                    _ => Err(ArgumentError::parse(e.render().to_string().trim_end())),
                };
            }
        };

        let mut current = matches;
        let mut path = Vec::new();
        while let Some((name, sub)) = current.remove_subcommand() {
            path.push(name);
            current = sub;
        }
        tracing::debug!(command = %path.join(" "), "Parsed command line");

        self.path = path;
        self.matches = Some(current);
        Ok(ControlFlow::Value(()))
    }

    fn update_rules(&mut self, rules: &mut ArgumentRules) -> ArgumentResult<()> {
        apply_rule_flags(self, rules)
    }

    fn can_read(&self, name: &str, _importance: ArgumentImportance) -> bool {
        if name == names::COMMAND {
            return !self.path.is_empty();
        }
        self.matches
            .as_ref()
            .is_some_and(|matches| Self::typed_on_command_line(matches, name))
    }

    fn read(&mut self, name: &str) -> ArgumentResult<Argument> {
        if name == names::COMMAND {
            return Ok(Argument::from(self.path.join(" ")));
        }
        match &self.matches {
            Some(matches) => Self::read_matches(matches, name),
            None => Err(ArgumentError::not_found(name)),
        }
    }

    fn usage(&self) -> Option<String> {
        self.usage.clone()
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::indexing_slicing
    )]

    use super::*;
    use crate::value::ArgumentValue;
    use clap::{Arg, ArgAction};

    fn command() -> Command {
        Command::new("keyroute")
            .version("1.2.3")
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .action(ArgAction::Count)
                    .global(true),
            )
            .arg(
                Arg::new(names::INTERACTIVE)
                    .long("interactive")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .arg(
                Arg::new(names::QUIET)
                    .long("quiet")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .subcommand(
                Command::new("encrypt")
                    .arg(Arg::new("in").long("in").action(ArgAction::Set))
                    .arg(
                        Arg::new("recipient-id")
                            .action(ArgAction::Append)
                            .num_args(0..),
                    ),
            )
            .subcommand(Command::new("card").subcommand(Command::new("create")))
    }

    fn init(args: &[&str]) -> CommandLineSource {
        let mut source = CommandLineSource::new(command(), args.iter().copied());
        assert_eq!(source.init().unwrap(), ControlFlow::Value(()));
        source
    }

    #[test]
    fn test_reads_typed_values() {
        let mut source = init(&["keyroute", "encrypt", "--in", "plain.txt", "email:a@b.c", "pubkey:k"]);
        let importance = ArgumentImportance::Required;

        assert!(source.can_read("in", importance));
        assert_eq!(source.read("in").unwrap(), Argument::from("plain.txt"));

        let recipients = source.read("recipient-id").unwrap();
        assert_eq!(recipients.as_list().len(), 2);
        assert_eq!(recipients.parse().as_list()[0].as_token().unwrap().key(), "email");
    }

    #[test]
    fn test_defaults_are_not_readable() {
        let source = init(&["keyroute", "encrypt"]);
        assert!(!source.can_read("in", ArgumentImportance::Optional));
        assert!(!source.can_read(names::INTERACTIVE, ArgumentImportance::Optional));
        assert!(!source.can_read("verbose", ArgumentImportance::Optional));
    }

    #[test]
    fn test_unknown_name_is_not_readable() {
        let source = init(&["keyroute", "encrypt"]);
        assert!(!source.can_read("no-such-arg", ArgumentImportance::Required));
    }

    #[test]
    fn test_flags_and_counts() {
        let mut source = init(&["keyroute", "-vv", "encrypt", "--interactive"]);
        assert!(source.can_read("verbose", ArgumentImportance::Optional));
        assert_eq!(
            source.read("verbose").unwrap().as_value().unwrap(),
            &ArgumentValue::Number(2)
        );
        assert_eq!(
            source.read(names::INTERACTIVE).unwrap().as_value().unwrap(),
            &ArgumentValue::Boolean(true)
        );
    }

    #[test]
    fn test_command_path() {
        let mut source = init(&["keyroute", "card", "create"]);
        assert_eq!(source.command_path(), ["card", "create"]);
        assert!(source.can_read(names::COMMAND, ArgumentImportance::Required));
        assert_eq!(
            source.read(names::COMMAND).unwrap(),
            Argument::from("card create")
        );

        let source = init(&["keyroute"]);
        assert!(!source.can_read(names::COMMAND, ArgumentImportance::Required));
    }

    #[test]
    fn test_rules_from_flags() {
        let mut source = init(&["keyroute", "encrypt", "--interactive"]);
        let mut rules = ArgumentRules::default();
        source.update_rules(&mut rules).unwrap();
        assert!(rules.allow_interactive);

        let mut source = init(&["keyroute", "--interactive", "--quiet", "encrypt"]);
        let mut rules = ArgumentRules::default();
        source.update_rules(&mut rules).unwrap();
        assert!(!rules.allow_interactive);
    }

    #[test]
    fn test_help_and_version() {
        let mut source = CommandLineSource::new(command(), ["keyroute", "--help"]);
        let ControlFlow::ShowUsage(help) = source.init().unwrap() else {
            panic!("expected usage");
        };
        assert!(help.contains("encrypt"));

        let mut source = CommandLineSource::new(command(), ["keyroute", "--version"]);
        let ControlFlow::ShowVersion(version) = source.init().unwrap() else {
            panic!("expected version");
        };
        assert!(version.contains("1.2.3"));
    }

    #[test]
    fn test_parse_error() {
        let mut source = CommandLineSource::new(command(), ["keyroute", "--bogus"]);
        let err = source.init().unwrap_err();
        assert!(matches!(err, ArgumentError::Parse { .. }));
        assert!(err.to_string().contains("--bogus"));
        assert!(source.usage().unwrap().contains("keyroute"));
    }
}
