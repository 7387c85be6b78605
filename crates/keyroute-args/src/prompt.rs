//! # Prompt Service
//!
//! Line-oriented user input for the interactive argument source.
//!
//! [`TerminalPrompt`] writes labels to stderr, reads plain answers from stdin
//! and hidden answers through `rpassword`. Secret answers are returned in
//! [`Zeroizing`] buffers so they are wiped once dropped.

use std::io::{self, BufRead, Write};

use zeroize::Zeroizing;

/// Source of user answers.
pub trait PromptService {
    /// Show a line of text to the user.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output cannot be written.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Show `prompt` and read one line. Returns `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the input cannot be read.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Show `prompt` and read one line without echoing it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the input cannot be read.
    fn read_secure(&mut self, prompt: &str) -> io::Result<Zeroizing<String>>;
}

/// Prompt on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    /// Create a terminal prompt.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PromptService for TerminalPrompt {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stderr(), "{line}")
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stderr = io::stderr();
        write!(stderr, "{prompt}")?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()))
    }

    fn read_secure(&mut self, prompt: &str) -> io::Result<Zeroizing<String>> {
        rpassword::prompt_password(prompt).map(Zeroizing::new)
    }
}

// ============================================================================
// Scripted prompt (tests)
// ============================================================================

#[cfg(any(test, feature = "mock"))]
mod scripted {
    use std::collections::VecDeque;
    use std::io;
    use std::sync::{Arc, Mutex, PoisonError};

    use zeroize::Zeroizing;

    use super::PromptService;

    #[derive(Debug, Default)]
    struct Script {
        answers: VecDeque<String>,
        transcript: Vec<String>,
        secure_reads: usize,
    }

    /// A prompt answering from a fixed script.
    ///
    /// Clones share the script, so a test can keep one handle and inspect
    /// the transcript after handing another to a source.
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedPrompt {
        script: Arc<Mutex<Script>>,
    }

    impl ScriptedPrompt {
        /// A prompt that answers with `answers` in order, then reports end
        /// of input.
        #[must_use]
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let script = Script {
                answers: answers.into_iter().map(Into::into).collect(),
                ..Script::default()
            };
            Self {
                script: Arc::new(Mutex::new(script)),
            }
        }

        /// Every line written and every prompt shown so far.
        #[must_use]
        pub fn transcript(&self) -> Vec<String> {
            self.with(|script| script.transcript.clone())
        }

        /// How many answers were read without echo.
        #[must_use]
        pub fn secure_reads(&self) -> usize {
            self.with(|script| script.secure_reads)
        }

        /// Answers not consumed yet.
        #[must_use]
        pub fn remaining(&self) -> usize {
            self.with(|script| script.answers.len())
        }

        fn with<T>(&self, f: impl FnOnce(&mut Script) -> T) -> T {
            let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut script)
        }
    }

    impl PromptService for ScriptedPrompt {
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.with(|script| script.transcript.push(line.to_string()));
            Ok(())
        }

        fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
            Ok(self.with(|script| {
                script.transcript.push(prompt.to_string());
                script.answers.pop_front()
            }))
        }

        fn read_secure(&mut self, prompt: &str) -> io::Result<Zeroizing<String>> {
            self.with(|script| {
                script.transcript.push(prompt.to_string());
                script.secure_reads += 1;
                script
                    .answers
                    .pop_front()
                    .map(Zeroizing::new)
                    .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
            })
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use scripted::ScriptedPrompt;
