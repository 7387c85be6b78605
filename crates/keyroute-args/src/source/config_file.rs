//! Arguments from the `[arguments]` table of the configuration file.

use std::collections::BTreeMap;

use keyroute_core::config::{ArgumentSetting, Config};
use keyroute_core::error::{ArgumentError, ArgumentResult};

use super::{apply_rule_flags, ArgumentSource};
use crate::importance::ArgumentImportance;
use crate::rules::{ArgumentRules, ControlFlow};
use crate::value::{Argument, ArgumentValue};

/// Arguments stored in the configuration file.
///
/// # Examples
///
/// ```
/// use keyroute_args::source::{ArgumentSource, ConfigFileSource};
/// use keyroute_args::{Argument, ArgumentImportance};
/// use keyroute_core::{ArgumentSetting, Config};
///
/// let config = Config::builder()
///     .argument("algorithm", ArgumentSetting::Text("rsa4096".into()))
///     .build();
/// let mut source = ConfigFileSource::from_config("config.toml", &config);
/// assert!(source.can_read("algorithm", ArgumentImportance::Required));
/// assert_eq!(source.read("algorithm").expect("read"), Argument::from("rsa4096"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigFileSource {
    label: String,
    settings: BTreeMap<String, ArgumentSetting>,
}

impl ConfigFileSource {
    /// A source over already loaded settings. `label` names the file in logs.
    #[must_use]
    pub fn from_settings(
        label: impl Into<String>,
        settings: BTreeMap<String, ArgumentSetting>,
    ) -> Self {
        Self {
            label: label.into(),
            settings,
        }
    }

    /// A source over the `[arguments]` table of `config`.
    #[must_use]
    pub fn from_config(label: impl Into<String>, config: &Config) -> Self {
        Self::from_settings(label, config.arguments.clone())
    }

    fn to_argument(setting: &ArgumentSetting) -> Argument {
        match setting {
            ArgumentSetting::Bool(value) => Argument::from(*value),
            ArgumentSetting::Integer(value) => Argument::from(*value),
            ArgumentSetting::Text(value) => Argument::from(value.as_str()),
            ArgumentSetting::List(values) => {
                values.iter().map(|v| ArgumentValue::from(v.as_str())).collect()
            }
        }
    }
}

impl ArgumentSource for ConfigFileSource {
    fn name(&self) -> &str {
        "config file"
    }

    fn init(&mut self) -> ArgumentResult<ControlFlow<()>> {
        tracing::debug!(
            file = %self.label,
            arguments = self.settings.len(),
            "Loaded arguments from configuration"
        );
        Ok(ControlFlow::Value(()))
    }

    fn update_rules(&mut self, rules: &mut ArgumentRules) -> ArgumentResult<()> {
        apply_rule_flags(self, rules)
    }

    fn can_read(&self, name: &str, _importance: ArgumentImportance) -> bool {
        self.settings.contains_key(name)
    }

    fn read(&mut self, name: &str) -> ArgumentResult<Argument> {
        self.settings
            .get(name)
            .map(Self::to_argument)
            .ok_or_else(|| ArgumentError::not_found(name))
    }
}
