//! Built-in default values.

use std::collections::BTreeMap;

use keyroute_core::error::{ArgumentError, ArgumentResult};

use super::ArgumentSource;
use crate::importance::ArgumentImportance;
use crate::value::Argument;

/// Fallback values supplied by the application.
#[derive(Debug, Clone)]
pub struct DefaultsSource {
    name: String,
    values: BTreeMap<String, Argument>,
}

impl Default for DefaultsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultsSource {
    /// An empty source named `defaults`.
    #[must_use]
    pub fn new() -> Self {
        Self::named("defaults")
    }

    /// An empty source with a custom log name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Add a default for `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl ArgumentSource for DefaultsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_read(&self, name: &str, _importance: ArgumentImportance) -> bool {
        self.values.contains_key(name)
    }

    fn read(&mut self, name: &str) -> ArgumentResult<Argument> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| ArgumentError::not_found(name))
    }
}
