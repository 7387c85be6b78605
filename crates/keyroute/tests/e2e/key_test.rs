//! Private keys from files and base64 text.

use keyroute::cli::commands::{EXIT_ERROR, EXIT_SUCCESS};
use keyroute_core::encoding::encode_base64;

use crate::common::TestEnv;

#[test]
fn test_key_info_from_file() {
    let env = TestEnv::new();
    let key = env.write_file("alice.key", b"alice-private-key");
    let output = env.run(&["key", "info", "-k", key.as_str(), "-p", "007", "--format", "json"]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    let json = output.json();
    assert_eq!(json["size"], 17);
    assert_eq!(json["password_given"], true);
    assert_eq!(json["output"], "-");
    assert!(!output.stdout.contains("007"));
}

#[test]
fn test_key_info_from_base64_without_password() {
    let env = TestEnv::new();
    let key = encode_base64(&[1, 2, 3]);
    let output = env.run(&["key", "info", "--key", key.as_str()]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.starts_with("Private key\n"));
    assert!(output.stdout.contains("Size: 3 bytes"));
    assert!(output.stdout.contains("Password given: no"));
}

#[test]
fn test_key_info_missing_key() {
    let env = TestEnv::new();
    let output = env.run(&["key", "info"]);

    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(output.stderr, "Error: Argument 'key' is not defined.\n");
}
