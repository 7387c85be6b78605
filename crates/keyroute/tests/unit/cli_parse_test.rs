//! CLI parsing tests: every command and the global options.

use clap::Parser;
use keyroute::cli::{CardCommands, Cli, Commands, KeyCommands};
use proptest::prelude::*;

use crate::common::recipient_token;

#[test]
fn test_keygen_options() {
    let cli = Cli::try_parse_from([
        "keyroute", "keygen", "-a", "secp256r1", "--hash-algorithm", "sha512", "-o", "me.key",
        "--no-password",
    ])
    .expect("should parse");
    match cli.command {
        Commands::Keygen {
            algorithm,
            hash_algorithm,
            out,
            private_key_password,
            no_password,
        } => {
            assert_eq!(algorithm.as_deref(), Some("secp256r1"));
            assert_eq!(hash_algorithm.as_deref(), Some("sha512"));
            assert_eq!(out.as_deref(), Some("me.key"));
            assert!(private_key_password.is_none());
            assert!(no_password);
        }
        other => panic!("Expected keygen, got {other:?}"),
    }
}

#[test]
fn test_encrypt_recipients_and_files() {
    let cli = Cli::try_parse_from([
        "keyroute",
        "encrypt",
        "--in",
        "plain.txt",
        "--content-info",
        "info.bin",
        "email:alice@example.com",
        "password:hunter2",
    ])
    .expect("should parse");
    match cli.command {
        Commands::Encrypt {
            input,
            content_info,
            recipient_id,
            ..
        } => {
            assert_eq!(input.as_deref(), Some("plain.txt"));
            assert_eq!(content_info.as_deref(), Some("info.bin"));
            assert_eq!(recipient_id, ["email:alice@example.com", "password:hunter2"]);
        }
        other => panic!("Expected encrypt, got {other:?}"),
    }
}

#[test]
fn test_decrypt_keypass() {
    let cli = Cli::try_parse_from(["keyroute", "decrypt", "-i", "secret.enc", "password:x"])
        .expect("should parse");
    match cli.command {
        Commands::Decrypt { input, keypass, .. } => {
            assert_eq!(input.as_deref(), Some("secret.enc"));
            assert_eq!(keypass, ["password:x"]);
        }
        other => panic!("Expected decrypt, got {other:?}"),
    }
}

#[test]
fn test_card_subcommands() {
    let cli = Cli::try_parse_from(["keyroute", "card", "search", "email:a@b.c", "-s", "global"])
        .expect("should parse");
    assert!(matches!(
        cli.command,
        Commands::Card(CardCommands::Search { identity: Some(_), scope: Some(_) })
    ));

    let cli = Cli::try_parse_from([
        "keyroute", "card", "create", "-i", "email:a@b.c", "-k", "a2V5",
    ])
    .expect("should parse");
    assert!(matches!(
        cli.command,
        Commands::Card(CardCommands::Create { public_key: Some(_), .. })
    ));

    let cli = Cli::try_parse_from(["keyroute", "card", "revoke", "c1", "-r", "compromised"])
        .expect("should parse");
    match cli.command {
        Commands::Card(CardCommands::Revoke { card_id, reason, .. }) => {
            assert_eq!(card_id.as_deref(), Some("c1"));
            assert_eq!(reason.as_deref(), Some("compromised"));
        }
        other => panic!("Expected card revoke, got {other:?}"),
    }
}

#[test]
fn test_card_get_and_key_info() {
    let cli = Cli::try_parse_from(["keyroute", "card", "get", "c1"]).expect("should parse");
    match cli.command {
        Commands::Card(CardCommands::Get { card_id }) => assert_eq!(card_id.as_deref(), Some("c1")),
        other => panic!("Expected card get, got {other:?}"),
    }

    let cli = Cli::try_parse_from(["keyroute", "key", "info", "-k", "alice.key", "-p", "007"])
        .expect("should parse");
    match cli.command {
        Commands::Key(KeyCommands::Info {
            key,
            private_key_password,
            out,
        }) => {
            assert_eq!(key.as_deref(), Some("alice.key"));
            assert_eq!(private_key_password.as_deref(), Some("007"));
            assert!(out.is_none());
        }
        other => panic!("Expected key info, got {other:?}"),
    }
}

#[test]
fn test_invalid_choices_rejected() {
    assert!(Cli::try_parse_from(["keyroute", "card", "search", "-s", "private"]).is_err());
    assert!(Cli::try_parse_from(["keyroute", "card", "revoke", "c1", "-r", "lost"]).is_err());
    assert!(Cli::try_parse_from(["keyroute", "card"]).is_err());
}

#[test]
fn test_global_options() {
    let cli = Cli::try_parse_from([
        "keyroute",
        "-q",
        "--interactive",
        "--interactive-optional",
        "-c",
        "other.toml",
        "-D",
        "algorithm=ed25519",
        "keygen",
    ])
    .expect("should parse");
    assert!(cli.quiet);
    assert!(cli.interactive);
    assert!(cli.interactive_optional);
    assert_eq!(cli.config.as_deref(), Some("other.toml"));
    assert_eq!(cli.define, ["algorithm=ed25519"]);
}

proptest! {
    #[test]
    fn test_encrypt_keeps_recipient_order(
        recipients in proptest::collection::vec(recipient_token(), 1..6)
    ) {
        let argv = ["keyroute", "encrypt"]
            .into_iter()
            .chain(recipients.iter().map(String::as_str));
        let cli = Cli::try_parse_from(argv).expect("should parse");
        match cli.command {
            Commands::Encrypt { recipient_id, .. } => prop_assert_eq!(recipient_id, recipients),
            other => panic!("Expected encrypt, got {other:?}"),
        }
    }
}
