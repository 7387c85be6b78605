//! # Test Utilities for keyroute
//!
//! - [`TestEnv`] - A temporary keyroute home with its own config and card
//!   directory
//! - [`RunOutput`] - Exit code and captured output of one run
//!
//! This module also provides proptest strategies for recipient tokens.

#![allow(dead_code)]
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use keyroute::{run, RunOptions};
use keyroute_args::ScriptedPrompt;
use proptest::prelude::*;
use tempfile::TempDir;

/// Exit code and captured output of one run.
#[derive(Debug)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    /// Parse standard output as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).expect("stdout should be JSON")
    }
}

/// A temporary keyroute home.
///
/// `config.toml` points the card directory into the same temporary
/// directory, so runs never touch the real home.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    /// A home whose config only sets the card directory.
    pub fn new() -> Self {
        Self::with_config("")
    }

    /// A home whose config also contains `extra` (TOML, placed before the
    /// `[directory]` table).
    pub fn with_config(extra: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cards = dir.path().join("cards");
        let config = format!(
            "{extra}\n[directory]\npath = '{}'\n\n[logging]\nformat = \"compact\"\n",
            cards.display()
        );
        std::fs::write(dir.path().join("config.toml"), config).expect("write config");
        Self { dir }
    }

    /// The temporary home.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The card directory.
    pub fn cards_dir(&self) -> PathBuf {
        self.dir.path().join("cards")
    }

    /// Write `contents` to `name` inside the home and return its path.
    pub fn write_file(&self, name: &str, contents: &[u8]) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write file");
        path.display().to_string()
    }

    /// Run with no prompt answers.
    pub fn run(&self, args: &[&str]) -> RunOutput {
        self.run_with_prompt(args, ScriptedPrompt::default())
    }

    /// Run answering prompts from `prompt`.
    pub fn run_with_prompt(&self, args: &[&str], prompt: ScriptedPrompt) -> RunOutput {
        let options = RunOptions {
            base_dir: Some(self.dir.path().to_path_buf()),
            install_logging: false,
        };
        let argv = std::iter::once("keyroute").chain(args.iter().copied());
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run(argv, prompt, &options, &mut stdout, &mut stderr);
        RunOutput {
            code,
            stdout: String::from_utf8(stdout).expect("stdout is UTF-8"),
            stderr: String::from_utf8(stderr).expect("stderr is UTF-8"),
        }
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// An email address.
pub fn email() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.]{0,12}@[a-z]{1,10}\\.(com|org|net)"
}

/// A recipient token, one of every tag the tool accepts.
pub fn recipient_token() -> impl Strategy<Value = String> {
    prop_oneof![
        email().prop_map(|address| format!("email:{address}")),
        "[a-zA-Z0-9._/-]{1,24}".prop_map(|path| format!("vcard:{path}")),
        "[a-zA-Z0-9+/]{2,44}".prop_map(|key| format!("pubkey:{key}")),
        "[a-zA-Z0-9+/]{2,44}:[a-zA-Z]{1,8}".prop_map(|key| format!("pubkey:{key}")),
        "[a-zA-Z0-9!#%&*_-]{1,20}".prop_map(|secret| format!("password:{secret}")),
    ]
}
