//! Configuration types for keyroute.
//!
//! # Configuration File
//!
//! Configuration is stored in TOML format at `~/.keyroute/config.toml`.
//! The `[arguments]` table supplies argument values by name; it is consulted
//! after the command line and `-D` overrides, and before built-in defaults.
//!
//! # Default TOML Output
//!
//! ```toml
//! [arguments]
//! # algorithm = "ed25519"
//! # interactive = true
//!
//! [directory]
//! path = "~/.keyroute/cards"
//!
//! [logging]
//! format = "pretty"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use keyroute_core::config::{ArgumentSetting, Config};
///
/// let toml_str = r#"
/// [arguments]
/// algorithm = "secp256r1"
/// interactive = true
/// recipient-id = ["email:alice@example.com", "pubkey:bob.pub"]
///
/// [directory]
/// path = "/var/lib/keyroute/cards"
/// "#;
///
/// let config: Config = toml::from_str(toml_str).expect("valid TOML");
/// assert_eq!(
///     config.arguments.get("algorithm"),
///     Some(&ArgumentSetting::Text("secp256r1".to_string()))
/// );
/// assert_eq!(config.directory.path, "/var/lib/keyroute/cards");
/// assert_eq!(config.logging.format, "pretty");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Argument values by argument name.
    #[serde(default)]
    pub arguments: BTreeMap<String, ArgumentSetting>,

    /// Local card directory configuration.
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One value in the `[arguments]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentSetting {
    /// `name = true`
    Bool(bool),
    /// `name = 3`
    Integer(i64),
    /// `name = "text"`
    Text(String),
    /// `name = ["a", "b"]`
    List(Vec<String>),
}

#[must_use]
fn default_directory_path() -> String {
    "~/.keyroute/cards".to_string()
}

#[must_use]
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Local card directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Directory holding one JSON file per card.
    #[serde(default = "default_directory_path")]
    pub path: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: default_directory_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format: `pretty`, `json` or `compact`.
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional log file, written in addition to stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Returns the documented default configuration file.
    #[must_use]
    pub fn default_toml() -> String {
        r#"[arguments]
# algorithm = "ed25519"
# interactive = true

[directory]
path = "~/.keyroute/cards"

[logging]
format = "pretty"
"#
        .to_string()
    }

    /// Creates a configuration builder for customizing values.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyroute_core::config::{ArgumentSetting, Config};
    ///
    /// let config = Config::builder()
    ///     .argument("algorithm", ArgumentSetting::Text("ed25519".into()))
    ///     .directory_path("/tmp/cards")
    ///     .build();
    ///
    /// assert_eq!(config.directory.path, "/tmp/cards");
    /// assert_eq!(config.arguments.len(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for creating customized [`Config`] instances.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new configuration builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Sets an argument value.
    #[must_use]
    pub fn argument(mut self, name: impl Into<String>, value: ArgumentSetting) -> Self {
        self.config.arguments.insert(name.into(), value);
        self
    }

    /// Sets the card directory path.
    #[must_use]
    pub fn directory_path(mut self, path: impl Into<String>) -> Self {
        self.config.directory.path = path.into();
        self
    }

    /// Sets the log format.
    #[must_use]
    pub fn log_format(mut self, format: impl Into<String>) -> Self {
        self.config.logging.format = format.into();
        self
    }

    /// Sets the log file.
    #[must_use]
    pub fn log_file(mut self, path: impl Into<String>) -> Self {
        self.config.logging.file = Some(path.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
