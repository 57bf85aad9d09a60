//! Tests for the transfer subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use serde_json::json;

#[test]
fn cli_parse_transfer_defaults() {
    match parse(&[
        "s2s",
        "transfer",
        "--download-url",
        "https://download.example.com/file.zip",
        "--upload-url",
        "https://upload.example.com/upload",
    ]) {
        CliCommand::Transfer(args) => {
            assert_eq!(args.download_url, "https://download.example.com/file.zip");
            assert_eq!(args.upload_url, "https://upload.example.com/upload");
            assert_eq!(args.method, "POST");
            assert!(args.content_length.is_none());
            assert_eq!(args.download_headers, "{}");
            assert_eq!(args.upload_headers, "{}");
            assert!(!args.no_throw_on_error);
        }
        _ => panic!("expected Transfer"),
    }
}

#[test]
fn cli_parse_transfer_all_flags() {
    match parse(&[
        "s2s",
        "transfer",
        "--download-url",
        "https://d.example/f",
        "--upload-url",
        "https://u.example/x?bearer=t",
        "--method",
        "PUT",
        "--content-length",
        "1024",
        "--upload-headers",
        "{\"X-A\":\"1\"}",
        "--no-throw-on-error",
    ]) {
        CliCommand::Transfer(args) => {
            assert_eq!(args.method, "PUT");
            assert_eq!(args.content_length, Some(1024));
            assert_eq!(args.upload_headers, "{\"X-A\":\"1\"}");
            assert!(args.no_throw_on_error);
        }
        _ => panic!("expected Transfer"),
    }
}

#[test]
fn cli_transfer_requires_urls() {
    assert!(Cli::try_parse_from(["s2s", "transfer", "--download-url", "https://d.example/f"]).is_err());
}

#[test]
fn transfer_args_map_to_host_params() {
    let CliCommand::Transfer(args) = parse(&[
        "s2s",
        "transfer",
        "--download-url",
        "https://d.example/f",
        "--upload-url",
        "https://u.example/x",
        "--content-length",
        "18",
        "--no-throw-on-error",
    ]) else {
        panic!("expected Transfer");
    };
    let p = args.to_params();
    assert_eq!(p["downloadUrl"], json!("https://d.example/f"));
    assert_eq!(p["uploadUrl"], json!("https://u.example/x"));
    assert_eq!(p["method"], json!("POST"));
    assert_eq!(p["contentLength"], json!(18));
    assert_eq!(p["throwOnError"], json!(false));

    let req = s2s_core::TransferRequest::resolve(&p, 0).unwrap();
    assert_eq!(req.content_length(), Some(18));
    assert!(!req.throw_on_error());
}
