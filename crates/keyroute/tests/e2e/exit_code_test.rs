//! Help, version, usage errors and error reporting.

use keyroute::cli::commands::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

use crate::common::TestEnv;

#[test]
fn test_help_exits_successfully() {
    let env = TestEnv::new();
    let output = env.run(&["--help"]);

    assert_eq!(output.code, EXIT_SUCCESS);
    assert!(output.stdout.contains("Usage: keyroute"));
    assert!(output.stdout.contains("keygen"));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_no_arguments_shows_help() {
    let env = TestEnv::new();
    let output = env.run(&[]);

    assert_eq!(output.code, EXIT_SUCCESS);
    assert!(output.stdout.contains("Usage: keyroute"));
}

#[test]
fn test_version() {
    let env = TestEnv::new();
    let output = env.run(&["--version"]);

    assert_eq!(output.code, EXIT_SUCCESS);
    assert!(output.stdout.starts_with("keyroute "));
}

#[test]
fn test_unknown_option_is_usage_error() {
    let env = TestEnv::new();
    let output = env.run(&["keygen", "--bogus"]);

    assert_eq!(output.code, EXIT_USAGE);
    assert!(output.stderr.contains("--bogus"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_verbose_error_includes_usage() {
    let env = TestEnv::new();
    let output = env.run(&["-v", "keygen"]);

    assert_eq!(output.code, EXIT_USAGE);
    assert!(output
        .stderr
        .starts_with("Error: Argument 'private-key-password' is not defined.\n"));
    assert!(output.stderr.contains("Usage: keyroute"));
}

#[test]
fn test_explicit_config_file() {
    let env = TestEnv::new();
    let other = env.write_file(
        "other.toml",
        b"[arguments]\nalgorithm = \"secp256r1\"\nno-password = true\n",
    );
    let output = env.run(&["-c", other.as_str(), "keygen"]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Algorithm: secp256r1"));
}

#[test]
fn test_missing_explicit_config_file() {
    let env = TestEnv::new();
    let missing = env.path().join("missing.toml");
    let missing = missing.display().to_string();
    let output = env.run(&["--config", missing.as_str(), "keygen"]);

    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(
        output.stderr,
        format!("Error: Configuration error: configuration file not found: {missing}\n")
    );
}

#[test]
fn test_invalid_config_file() {
    let env = TestEnv::new();
    env.write_file("config.toml", b"[arguments\n");
    let output = env.run(&["keygen"]);

    assert_eq!(output.code, EXIT_ERROR);
    assert!(output
        .stderr
        .starts_with("Error: Configuration error: failed to parse configuration"));
}
