//! The local card directory through the command line.

use keyroute::cli::commands::{EXIT_ERROR, EXIT_SUCCESS};
use keyroute_core::encoding::encode_base64;

use crate::common::TestEnv;

fn create_card(env: &TestEnv, identity: &str, scope: &str) -> String {
    let key = encode_base64(b"alice-public-key");
    let output = env.run(&[
        "card",
        "create",
        "-i",
        identity,
        "-s",
        scope,
        "-k",
        key.as_str(),
        "--application-token",
        "app-token-0123456789",
        "--format",
        "json",
    ]);
    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    output.json()["card"]["id"]
        .as_str()
        .expect("card id")
        .to_string()
}

#[test]
fn test_create_and_search() {
    let env = TestEnv::new();
    let id = create_card(&env, "email:alice@example.com", "global");
    assert!(env.cards_dir().join(format!("{id}.json")).is_file());

    let output = env.run(&["card", "search", "email:alice@example.com", "-s", "global"]);
    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert!(output
        .stdout
        .starts_with("Cards for email:alice@example.com (global scope):\n"));
    assert!(output.stdout.contains(&format!("  - {id} email:alice@example.com (global")));

    let output = env.run(&["card", "search", "email:alice@example.com"]);
    assert_eq!(
        output.stdout,
        "No cards found for email:alice@example.com in application scope.\n"
    );
}

#[test]
fn test_get_card() {
    let env = TestEnv::new();
    let id = create_card(&env, "email:alice@example.com", "global");

    let output = env.run(&["card", "get", id.as_str(), "--format", "json"]);
    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    let json = output.json();
    assert_eq!(json["card"]["id"], id.as_str());
    assert_eq!(json["card"]["identity"], "alice@example.com");

    let exported = env.write_file("alice.vcard", json["exported"].as_str().expect("exported").as_bytes());
    let recipient = format!("vcard:{exported}");
    let output = env.run(&["encrypt", recipient.as_str(), "--format", "json"]);
    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert_eq!(output.json()["recipients"][0]["identifier"], id.as_str());
}

#[test]
fn test_get_unknown_card() {
    let env = TestEnv::new();
    let output = env.run(&["card", "get", "deadbeef"]);
    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(output.stderr, "Error: Directory error: card not found: deadbeef\n");
}

#[test]
fn test_encrypt_to_published_card() {
    let env = TestEnv::new();
    let id = create_card(&env, "email:alice@example.com", "application");

    let output = env.run(&["encrypt", "email:alice@example.com", "--format", "json"]);
    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    let json = output.json();
    assert_eq!(json["recipients"][0]["kind"], "key");
    assert_eq!(json["recipients"][0]["identifier"], id.as_str());
}

#[test]
fn test_create_conflict() {
    let env = TestEnv::new();
    create_card(&env, "email:alice@example.com", "application");

    let key = encode_base64(b"other-key");
    let output = env.run(&[
        "card",
        "create",
        "-i",
        "email:alice@example.com",
        "-k",
        key.as_str(),
    ]);
    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(
        output.stderr,
        "Error: Directory error: card already exists for identity: alice@example.com\n"
    );
}

#[test]
fn test_revoke() {
    let env = TestEnv::new();
    let id = create_card(&env, "email:alice@example.com", "application");

    let output = env.run(&["card", "revoke", id.as_str(), "-r", "compromised"]);
    assert_eq!(output.code, EXIT_SUCCESS, "stderr: {}", output.stderr);
    assert_eq!(output.stdout, format!("Revoked card {id} (compromised)\n"));

    let output = env.run(&["encrypt", "email:alice@example.com"]);
    assert_eq!(output.code, EXIT_ERROR);
}

#[test]
fn test_revoke_unknown_card() {
    let env = TestEnv::new();
    let output = env.run(&["card", "revoke", "deadbeef"]);

    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(
        output.stderr,
        "Error: Directory error: card not found: deadbeef\n"
    );
}
