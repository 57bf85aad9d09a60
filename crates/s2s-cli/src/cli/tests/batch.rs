//! Tests for the batch and config subcommands.

use super::parse;
use crate::cli::commands::{parse_batch, render_outcomes};
use crate::cli::CliCommand;
use s2s_core::transfer::{TransferFailure, TransferResult};
use s2s_core::{ConfigError, TransferError};
use serde_json::json;

#[test]
fn cli_parse_batch() {
    match parse(&["s2s", "batch", "items.json"]) {
        CliCommand::Batch { path, jobs } => {
            assert_eq!(path, std::path::Path::new("items.json"));
            assert!(jobs.is_none());
        }
        _ => panic!("expected Batch"),
    }
}

#[test]
fn cli_parse_batch_jobs() {
    match parse(&["s2s", "batch", "items.json", "--jobs", "8"]) {
        CliCommand::Batch { jobs, .. } => assert_eq!(jobs, Some(8)),
        _ => panic!("expected Batch with --jobs"),
    }
}

#[test]
fn cli_parse_config() {
    assert!(matches!(parse(&["s2s", "config"]), CliCommand::Config));
}

#[test]
fn batch_file_is_array_of_objects() {
    let items = parse_batch(
        r#"[
            {"downloadUrl": "https://d.example/a", "uploadUrl": "https://u.example/a"},
            {"downloadUrl": "https://d.example/b", "uploadUrl": "https://u.example/b", "method": "PUT"}
        ]"#,
    )
    .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["method"], json!("PUT"));
    assert!(parse_batch(r#"{"downloadUrl": "x"}"#).is_err());
}

#[test]
fn render_counts_raised_items() {
    let outcomes = vec![
        Ok(TransferResult::Failure(TransferFailure {
            error: "Download failed with HTTP 404".to_string(),
            download_status: Some(404),
            upload_status: None,
        })),
        Err(TransferError::Config(ConfigError::EmptyUploadUrl)),
    ];
    let (rendered, raised) = render_outcomes(&outcomes);
    assert_eq!(raised, 1);
    assert_eq!(
        rendered,
        json!([
            { "error": "Download failed with HTTP 404", "downloadStatus": 404 },
            { "error": "Upload URL is required and cannot be empty" }
        ])
    );
}
