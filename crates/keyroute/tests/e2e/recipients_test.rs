//! Encryption recipients and decryption credentials.

use keyroute::cli::commands::{EXIT_ERROR, EXIT_SUCCESS};
use keyroute_core::encoding::encode_base64;

use crate::common::TestEnv;

#[test]
fn test_encrypt_password_and_public_key_file() {
    let env = TestEnv::new();
    let key = env.write_file("bob.pub", b"bob-public-key");
    let recipient = format!("pubkey:{key}:bob");
    let output = env.run(&["encrypt", "password:hunter2", recipient.as_str()]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.starts_with("Encryption request\n"));
    assert!(output.stdout.contains("  Input: -\n"));
    assert!(output.stdout.contains("  Content info: embedded\n"));
    assert!(output.stdout.contains("  - password\n"));
    assert!(output.stdout.contains("  - key bob (sha256 "));
    assert!(!output.stdout.contains("hunter2"));
}

#[test]
fn test_encrypt_recipients_from_define() {
    let env = TestEnv::new();
    let output = env.run(&[
        "-D",
        "recipient-id=password:one",
        "-D",
        "recipient-id=password:two",
        "encrypt",
        "--format",
        "json",
    ]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    let json = output.json();
    let recipients = json["recipients"].as_array().expect("recipients array");
    assert_eq!(recipients.len(), 2);
    assert!(recipients.iter().all(|entry| entry["kind"] == "password"));
}

#[test]
fn test_encrypt_unknown_email() {
    let env = TestEnv::new();
    let output = env.run(&["encrypt", "email:nobody@example.com"]);

    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(
        output.stderr,
        "Error: Recipient is not found by email: 'nobody@example.com'.\n"
    );
}

#[test]
fn test_encrypt_without_recipients() {
    let env = TestEnv::new();
    let output = env.run(&["encrypt"]);

    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(output.stderr, "Error: Argument 'recipient-id' is not defined.\n");
}

#[test]
fn test_encrypt_missing_input_file() {
    let env = TestEnv::new();
    let missing = env.path().join("missing.txt");
    let missing = missing.display().to_string();
    let output = env.run(&["encrypt", "--in", missing.as_str(), "password:x"]);

    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(
        output.stderr,
        format!("Error: File is not found: '{missing}'.\n")
    );
}

#[test]
fn test_decrypt_first_working_credential() {
    let env = TestEnv::new();
    let pubkey = format!("pubkey:{}", encode_base64(b"public"));
    let privkey = format!("privkey:{}:alice", encode_base64(b"private"));
    let output = env.run(&[
        "decrypt",
        pubkey.as_str(),
        privkey.as_str(),
        "password:hunter2",
        "-p",
        "secret",
    ]);

    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Credential: privkey:<hidden>:alice"));
    assert!(output.stdout.contains("  - private-key alice (sha256 "));
    assert!(output.stdout.contains("password: yes"));
    assert!(!output.stdout.contains("secret"));
}

#[test]
fn test_decrypt_no_working_credential() {
    let env = TestEnv::new();
    let pubkey = format!("pubkey:{}", encode_base64(b"public"));
    let output = env.run(&["decrypt", pubkey.as_str()]);

    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(
        output.stderr,
        "Error: Crypto error: Can not decrypt with any of the given credentials.\n"
    );
}
