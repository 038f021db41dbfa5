//! Tests for inspect, checksum, completions, man and signature parsing.

use super::parse;
use crate::cli::commands::parse_signature;
use crate::cli::CliCommand;
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_inspect() {
    match parse(&["afetch", "inspect", "gradle-wrapper.jar", "--min-size", "50000"]) {
        CliCommand::Inspect(a) => {
            assert_eq!(a.path, Path::new("gradle-wrapper.jar"));
            assert_eq!(a.policy.min_size, Some(50_000));
            assert!(!a.json);
        }
        _ => panic!("expected Inspect"),
    }
}

#[test]
fn cli_parse_checksum() {
    match parse(&["afetch", "checksum", "/tmp/file.bin"]) {
        CliCommand::Checksum { path } => assert_eq!(path, "/tmp/file.bin"),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_completions_and_man() {
    match parse(&["afetch", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
    assert!(matches!(parse(&["afetch", "man"]), CliCommand::Man));
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(crate::cli::Cli::try_parse_from(["afetch", "download"]).is_err());
}

#[test]
fn signature_hex() {
    assert_eq!(parse_signature("504b").unwrap(), vec![0x50, 0x4B]);
    assert_eq!(parse_signature(" 1F8B ").unwrap(), vec![0x1F, 0x8B]);
    assert!(parse_signature("").is_err());
    assert!(parse_signature("5").is_err());
    assert!(parse_signature("pk").is_err());
}
