//! # Application Driver
//!
//! Turns argv into an exit code:
//!
//! 1. `-D` overrides are split off argv.
//! 2. Global flags are scanned leniently to find the config file and the
//!    log level before the real parse.
//! 3. The config file is loaded and logging is initialised.
//! 4. The argument source chain is assembled in priority order: command
//!    line, overrides, config file, defaults, prompt.
//! 5. The chain is initialised; help and version requests end here.
//! 6. The command named on the command line runs and writes its report.
//!
//! Every failure is reported as one `Error: ...` line. With `-v` the usage
//! follows and the exit code is [`EXIT_USAGE`].

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory};
use keyroute_args::source::{
    split_overrides, CommandLineSource, ConfigFileSource, DefaultsSource, InteractiveSource,
    OverrideSource,
};
use keyroute_args::{ArgumentImportance, ArgumentSourceChain, ControlFlow, PromptService};
use keyroute_core::config_loader::{expand_path, ConfigLoader};
use keyroute_core::error::{ArgumentError, ConfigError};
use keyroute_core::Config;
use keyroute_resolve::io::names;
use keyroute_resolve::{default_chain, ArgumentIo, DirectoryService, LocalCardDirectory};
use tracing::{debug, info};

use crate::cli::commands::{
    dispatch, CommandError, OutputFormat, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE, FORMAT,
};
use crate::cli::Cli;
use crate::logging::{init_logging, verbosity_to_level, LogConfig, LogError, LogGuard, LogLevel};

/// Built-in argument defaults, the last source before the prompt.
pub const DEFAULTS: [(&str, &str); 3] = [
    (names::ALGORITHM, "ed25519"),
    (names::HASH_ALGORITHM, "sha256"),
    (FORMAT, "text"),
];

// ============================================================================
// AppError
// ============================================================================

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialised.
    #[error(transparent)]
    Logging(#[from] LogError),

    /// Argument resolution failed before a command ran.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// The command failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}

// ============================================================================
// Options
// ============================================================================

/// How [`run`] interacts with its environment.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Base directory used instead of `~/.keyroute`.
    pub base_dir: Option<PathBuf>,
    /// Install the global tracing subscriber.
    pub install_logging: bool,
}

impl RunOptions {
    /// Options for the real binary.
    #[must_use]
    pub const fn binary() -> Self {
        Self {
            base_dir: None,
            install_logging: true,
        }
    }
}

/// Global flags needed before the argument chain exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Globals {
    /// `-v` count.
    pub verbose: u8,
    /// `--quiet`.
    pub quiet: bool,
    /// `--config PATH`.
    pub config: Option<String>,
}

impl Globals {
    /// Scan `args` (binary name first) without failing.
    ///
    /// Parse errors are ignored here; the command-line source reports them
    /// later with the full grammar.
    #[must_use]
    pub fn scan(args: &[String]) -> Self {
        let Ok(matches) = Cli::command()
            .ignore_errors(true)
            .try_get_matches_from(args)
        else {
            return Self::default();
        };

        let mut current: &ArgMatches = &matches;
        while let Some((_, sub)) = current.subcommand() {
            current = sub;
        }

        Self {
            verbose: current
                .try_get_one::<u8>("verbose")
                .ok()
                .flatten()
                .copied()
                .unwrap_or_default(),
            quiet: current
                .try_get_one::<bool>("quiet")
                .ok()
                .flatten()
                .copied()
                .unwrap_or_default(),
            config: current
                .try_get_one::<String>("config")
                .ok()
                .flatten()
                .cloned(),
        }
    }

    /// The log level these flags ask for.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        if self.quiet {
            LogLevel::Error
        } else {
            verbosity_to_level(self.verbose)
        }
    }
}

// ============================================================================
// Steps
// ============================================================================

/// Load the config named by `--config`, or the default one.
///
/// # Errors
///
/// Returns [`ConfigError::FileNotFound`] if an explicitly named file does
/// not exist, or a parse error for invalid TOML.
pub fn load_config(
    explicit: Option<&str>,
    base_dir: Option<&PathBuf>,
) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return ConfigLoader::load_file(&expand_path(path)?);
    }
    let loader = match base_dir {
        Some(base_dir) => ConfigLoader::with_base_dir(base_dir.clone()),
        None => match ConfigLoader::new() {
            Ok(loader) => loader,
            Err(ConfigError::NoHomeDirectory) => return Ok(Config::default()),
            Err(e) => return Err(e),
        },
    };
    loader.load()
}

/// Logging settings from the global flags and the `[logging]` section.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for an unknown log format.
pub fn log_config(globals: &Globals, config: &Config) -> Result<LogConfig, ConfigError> {
    let format = config
        .logging
        .format
        .parse()
        .map_err(|_| ConfigError::invalid_value("logging.format", &config.logging.format))?;
    let file_path = config.logging.file.as_deref().map(expand_path).transpose()?;
    Ok(LogConfig {
        level: globals.log_level(),
        format,
        file_path,
    })
}

/// Assemble the argument source chain in priority order.
#[must_use]
pub fn source_chain(
    args: Vec<String>,
    overrides: Vec<String>,
    config: &Config,
    config_label: &str,
    prompt: impl PromptService + 'static,
) -> ArgumentSourceChain {
    let defaults = DEFAULTS
        .iter()
        .fold(DefaultsSource::new(), |defaults, (name, value)| {
            defaults.with(*name, *value)
        });

    ArgumentSourceChain::new()
        .with(CommandLineSource::new(Cli::command(), args))
        .with(OverrideSource::new(overrides))
        .with(ConfigFileSource::from_config(config_label, config))
        .with(defaults)
        .with(
            InteractiveSource::new(prompt)
                .with_secret(names::PRIVATE_KEY_PASSWORD)
                .with_secret(names::KEYPASS),
        )
}

/// The card directory named by the `[directory]` section.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the path starts with `~` and
/// there is no home directory.
pub fn card_directory(config: &Config) -> Result<Arc<dyn DirectoryService>, ConfigError> {
    let root = expand_path(&config.directory.path)?;
    let directory: Arc<dyn DirectoryService> = Arc::new(LocalCardDirectory::new(root));
    Ok(directory)
}

// ============================================================================
// Run
// ============================================================================

enum Outcome {
    Done,
    Show(String),
    Usage(String),
}

fn execute(
    args: Vec<String>,
    overrides: Vec<String>,
    config: &Config,
    config_label: &str,
    prompt: impl PromptService + 'static,
    out: &mut dyn Write,
) -> Result<Outcome, (AppError, Option<String>)> {
    let mut sources = source_chain(args, overrides, config, config_label, prompt);
    debug!(sources = ?sources.source_names(), "Assembled argument sources");

    match sources.init() {
        Ok(ControlFlow::Value(())) => {}
        Ok(ControlFlow::ShowUsage(text) | ControlFlow::ShowVersion(text)) => {
            return Ok(Outcome::Show(text));
        }
        Err(ArgumentError::Parse { context }) => return Ok(Outcome::Usage(context)),
        Err(e) => return Err((e.into(), sources.usage())),
    }

    let directory = card_directory(config).map_err(|e| (e.into(), sources.usage()))?;
    let mut io = ArgumentIo::new(sources, default_chain(Arc::clone(&directory)));

    let result = (|| -> Result<(), AppError> {
        let format: OutputFormat = io
            .source_mut()
            .read_string(FORMAT, ArgumentImportance::Optional)?
            .parse()?;
        let command = io
            .get_command()?
            .ok_or_else(|| ArgumentError::not_found(keyroute_args::names::COMMAND))?;
        info!(%command, "Running command");
        dispatch(&command, &mut io, &directory, format, out)?;
        Ok(())
    })();

    result
        .map(|()| Outcome::Done)
        .map_err(|e| (e, io.source_mut().usage()))
}

/// Run the tool with `args` (binary name first) and return the exit code.
///
/// Reports go to `out`; errors, help and version text to `err` and `out`
/// as a shell user expects.
pub fn run<I, T>(
    args: I,
    prompt: impl PromptService + 'static,
    options: &RunOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let (args, overrides) = split_overrides(args.into_iter().map(Into::into));
    let globals = Globals::scan(&args);

    let config = match load_config(globals.config.as_deref(), options.base_dir.as_ref()) {
        Ok(config) => config,
        Err(e) => return report(&AppError::from(e), None, &globals, err),
    };

    let _guard: Option<LogGuard> = if options.install_logging {
        match log_config(&globals, &config)
            .map_err(AppError::from)
            .and_then(|log| init_logging(&log).map_err(AppError::from))
        {
            Ok(guard) => Some(guard),
            Err(e) => return report(&e, None, &globals, err),
        }
    } else {
        None
    };

    let config_label = globals.config.as_deref().unwrap_or("config file");
    match execute(args, overrides, &config, config_label, prompt, out) {
        Ok(Outcome::Done) => EXIT_SUCCESS,
        Ok(Outcome::Show(text)) => {
            let _ = write!(out, "{text}");
            EXIT_SUCCESS
        }
        Ok(Outcome::Usage(text)) => {
            let _ = writeln!(err, "{text}");
            EXIT_USAGE
        }
        Err((e, usage)) => report(&e, usage, &globals, err),
    }
}

fn report(error: &AppError, usage: Option<String>, globals: &Globals, err: &mut dyn Write) -> i32 {
    let _ = writeln!(err, "Error: {error}");
    if globals.verbose > 0 {
        if let Some(usage) = usage {
            let _ = writeln!(err, "{}", usage.trim_end());
            return EXIT_USAGE;
        }
    }
    EXIT_ERROR
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

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_scan_globals_after_subcommand() {
        let globals = Globals::scan(&args(&["keyroute", "card", "search", "-vv", "-c", "k.toml"]));
        assert_eq!(globals.verbose, 2);
        assert!(!globals.quiet);
        assert_eq!(globals.config.as_deref(), Some("k.toml"));
    }

    #[test]
    fn test_scan_globals_survives_bad_args() {
        let globals = Globals::scan(&args(&["keyroute", "encrypt", "--bogus", "-v"]));
        assert!(globals.verbose <= 1);
        assert_eq!(Globals::scan(&args(&["keyroute"])), Globals::default());
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        let globals = Globals {
            verbose: 3,
            quiet: true,
            config: None,
        };
        assert_eq!(globals.log_level(), LogLevel::Error);
        assert_eq!(Globals::default().log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let err = load_config(Some("/nonexistent/keyroute.toml"), None).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_default_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, Some(&dir.path().to_path_buf())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_log_config_rejects_unknown_format() {
        let config = Config::builder().log_format("xml").build();
        let err = log_config(&Globals::default(), &config).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for logging.format: xml");
    }

    #[test]
    fn test_report_with_usage_when_verbose() {
        let error = AppError::Argument(ArgumentError::not_found("keypass"));
        let mut err = Vec::new();
        let code = report(
            &error,
            Some("Usage: keyroute <COMMAND>\n".to_string()),
            &Globals {
                verbose: 1,
                ..Globals::default()
            },
            &mut err,
        );
        assert_eq!(code, EXIT_USAGE);
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Error: Argument 'keypass' is not defined.\nUsage: keyroute <COMMAND>\n"
        );

        let mut err = Vec::new();
        let code = report(&error, Some("usage".to_string()), &Globals::default(), &mut err);
        assert_eq!(code, EXIT_ERROR);
    }
}
