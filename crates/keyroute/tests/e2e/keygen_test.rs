//! Key pair requests: where the password and algorithm come from.

use keyroute::cli::commands::{EXIT_ERROR, EXIT_SUCCESS};
use keyroute_args::ScriptedPrompt;

use crate::common::TestEnv;

#[test]
fn test_keygen_with_password_on_command_line() {
    let env = TestEnv::new();
    let output = env.run(&["keygen", "-p", "hunter2"]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Algorithm: ed25519"));
    assert!(output.stdout.contains("Hash algorithm: sha256"));
    assert!(output.stdout.contains("Password protected: yes"));
    assert!(!output.stdout.contains("hunter2"));
}

#[test]
fn test_keygen_no_password_json() {
    let env = TestEnv::new();
    let output = env.run(&["keygen", "--no-password", "-o", "me.key", "--format", "json"]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    let json = output.json();
    assert_eq!(json["algorithm"], "ed25519");
    assert_eq!(json["hash_algorithm"], "sha256");
    assert_eq!(json["password_protected"], false);
    assert_eq!(json["output"], "me.key");
}

#[test]
fn test_keygen_missing_password_without_prompt() {
    let env = TestEnv::new();
    let output = env.run(&["keygen"]);

    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(
        output.stderr,
        "Error: Argument 'private-key-password' is not defined.\n"
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_keygen_prompts_for_password() {
    let env = TestEnv::new();
    let prompt = ScriptedPrompt::new(["", "hunter2"]);
    let output = env.run_with_prompt(&["--interactive", "keygen"], prompt.clone());

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Password protected: yes"));
    assert_eq!(prompt.secure_reads(), 2);
    assert_eq!(prompt.remaining(), 0);
    assert!(prompt
        .transcript()
        .iter()
        .any(|line| line.contains("Type value for option: private-key-password")));
}

#[test]
fn test_keygen_quiet_never_prompts() {
    let env = TestEnv::new();
    let prompt = ScriptedPrompt::new(["hunter2"]);
    let output = env.run_with_prompt(&["--interactive", "-q", "keygen"], prompt.clone());

    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(prompt.remaining(), 1);
    assert!(prompt.transcript().is_empty());
}

#[test]
fn test_define_overrides_default() {
    let env = TestEnv::new();
    let output = env.run(&["-D", "algorithm=secp256r1", "keygen", "--no-password"]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Algorithm: secp256r1"));
}

#[test]
fn test_command_line_beats_define() {
    let env = TestEnv::new();
    let output = env.run(&[
        "keygen",
        "-a",
        "ed25519",
        "-D",
        "algorithm=secp256r1",
        "-D",
        "no-password=true",
    ]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Algorithm: ed25519"));
    assert!(output.stdout.contains("Password protected: no"));
}

#[test]
fn test_config_file_arguments() {
    let env = TestEnv::with_config(
        "[arguments]\nalgorithm = \"secp256r1\"\nno-password = true\n",
    );

    let output = env.run(&["keygen"]);
    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Algorithm: secp256r1"));
    assert!(output.stdout.contains("Password protected: no"));

    let output = env.run(&["-D", "algorithm=ed25519", "keygen"]);
    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Algorithm: ed25519"));
}

#[test]
fn test_unknown_algorithm_is_reported() {
    let env = TestEnv::new();
    let output = env.run(&["keygen", "-a", "rsa1024", "--no-password"]);

    assert_eq!(output.code, EXIT_ERROR);
    assert!(output.stderr.starts_with("Error: "));
    assert!(output.stderr.contains("rsa1024"));
}
