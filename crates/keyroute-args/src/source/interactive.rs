//! Arguments typed by the user.

use std::collections::BTreeSet;
use std::io;
use std::sync::Arc;

use keyroute_core::error::{ArgumentError, ArgumentResult};
use zeroize::Zeroizing;

use super::ArgumentSource;
use crate::importance::ArgumentImportance;
use crate::prompt::PromptService;
use crate::rules::ArgumentRules;
use crate::value::{Argument, ArgumentValue};

/// Prompt shown before every answer.
pub const PROMPT: &str = ">>> ";

/// Asks the user for arguments no other source provides.
///
/// Reachable only when the rules allow prompting: required arguments need
/// `allow_interactive`, optional ones also `allow_interactive_for_optional`.
/// Answers for names marked secret are read without echo.
pub struct InteractiveSource {
    prompt: Box<dyn PromptService>,
    secrets: BTreeSet<String>,
    rules: Arc<ArgumentRules>,
}

impl InteractiveSource {
    /// A source asking through `prompt`.
    pub fn new(prompt: impl PromptService + 'static) -> Self {
        Self {
            prompt: Box::new(prompt),
            secrets: BTreeSet::new(),
            rules: Arc::default(),
        }
    }

    /// Read `name` without echo.
    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>) -> Self {
        self.secrets.insert(name.into());
        self
    }

    fn prompt_error(name: &str, e: io::Error) -> ArgumentError {
        ArgumentError::io(format!("failed to read value for option '{name}'"), e)
    }

    fn end_of_input(name: &str) -> ArgumentError {
        Self::prompt_error(name, io::Error::from(io::ErrorKind::UnexpectedEof))
    }

    /// Trim in place and move the buffer out, leaving no unwiped copy.
    fn take_trimmed(mut answer: Zeroizing<String>) -> String {
        let end = answer.trim_end().len();
        answer.truncate(end);
        let start = answer.len() - answer.trim_start().len();
        answer.drain(..start);
        std::mem::take(&mut *answer)
    }

    fn answer(&mut self, name: &str) -> ArgumentResult<Option<String>> {
        if self.secrets.contains(name) {
            let answer = self
                .prompt
                .read_secure(PROMPT)
                .map_err(|e| Self::prompt_error(name, e))?;
            Ok(Some(Self::take_trimmed(answer)))
        } else {
            let answer = self
                .prompt
                .read_line(PROMPT)
                .map_err(|e| Self::prompt_error(name, e))?;
            Ok(answer.map(|line| line.trim().to_string()))
        }
    }

    fn label(&mut self, text: &str, name: &str) -> ArgumentResult<()> {
        self.prompt
            .write_line(text)
            .map_err(|e| Self::prompt_error(name, e))
    }

    fn ask_non_empty(&mut self, name: &str) -> ArgumentResult<String> {
        loop {
            match self.answer(name)? {
                Some(answer) if !answer.is_empty() => return Ok(answer),
                Some(_) => {}
                None => return Err(Self::end_of_input(name)),
            }
        }
    }
}

impl std::fmt::Debug for InteractiveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractiveSource")
            .field("secrets", &self.secrets)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl ArgumentSource for InteractiveSource {
    fn name(&self) -> &str {
        "user input"
    }

    fn set_rules(&mut self, rules: Arc<ArgumentRules>) {
        self.rules = rules;
    }

    fn can_read(&self, _name: &str, importance: ArgumentImportance) -> bool {
        match importance {
            ArgumentImportance::Required => self.rules.allow_interactive,
            ArgumentImportance::Optional => {
                self.rules.allow_interactive && self.rules.allow_interactive_for_optional
            }
        }
    }

    fn read(&mut self, name: &str) -> ArgumentResult<Argument> {
        self.label(&format!("Type value for option: {name}"), name)?;
        Ok(Argument::from(self.ask_non_empty(name)?))
    }

    fn read_list(&mut self, name: &str) -> ArgumentResult<Argument> {
        self.label(
            &format!("Type values for option: {name} (finish with an empty line)"),
            name,
        )?;
        let mut values = vec![ArgumentValue::from(self.ask_non_empty(name)?)];
        while let Some(answer) = self.answer(name)? {
            if answer.is_empty() {
                break;
            }
            values.push(ArgumentValue::from(answer));
        }
        Ok(Argument::from_values(values))
    }

    fn read_flag(&mut self, name: &str) -> ArgumentResult<Argument> {
        self.label(&format!("Type value for option: {name} (yes/no)"), name)?;
        let answer = self.ask_non_empty(name)?;
        Ok(Argument::from(answer.eq_ignore_ascii_case("yes")))
    }
}
