//! Unit tests for CLI parsing and wiring

use crate::cli::{build_service, open_store, Cli, StoreKind};
use crate::handler::HandlerRequest;
use crate::logging::LogFormat;
use clap::Parser;
use http::Method;

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["survey-intake"]).unwrap();
    assert_eq!(cli.addr, "0.0.0.0:8080");
    assert_eq!(cli.store, StoreKind::Memory);
    assert_eq!(cli.max_body_bytes, 64 * 1024);
    assert_eq!(cli.log_level, "info");
    assert_eq!(cli.log_format, LogFormat::Json);
    assert!(!cli.log_location);
    assert!(!cli.log_config().include_location);
}

#[test]
fn test_all_flags() {
    let cli = Cli::try_parse_from([
        "survey-intake",
        "--addr",
        "127.0.0.1:9000",
        "--store",
        "file",
        "--data-dir",
        "/tmp/answers",
        "--max-body-bytes",
        "1024",
        "--log-level",
        "debug",
        "--log-format",
        "pretty",
        "--log-location",
    ])
    .unwrap();
    assert_eq!(cli.addr, "127.0.0.1:9000");
    assert_eq!(cli.store, StoreKind::File);
    assert_eq!(cli.data_dir.to_string_lossy(), "/tmp/answers");
    assert_eq!(cli.max_body_bytes, 1024);
    let log = cli.log_config();
    assert_eq!(log.log_level, "debug");
    assert_eq!(log.format, LogFormat::Pretty);
    assert!(log.include_location);
}

#[test]
fn test_unknown_store_rejected() {
    assert!(Cli::try_parse_from(["survey-intake", "--store", "redis"]).is_err());
}

#[test]
fn test_file_store_wiring() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("answers");
    let store = open_store(StoreKind::File, &dir).unwrap();
    let service = build_service(std::sync::Arc::clone(&store), 1024);

    let res = service.process(&HandlerRequest::new(
        Method::POST,
        "/",
        r#"{"host":"example.com","rate":2}"#,
    ));
    assert_eq!(res.status, 200);
    let key = res.body["key"].as_str().unwrap();
    assert!(dir.join(format!("{key}.json")).is_file());
    assert!(store.get(key).unwrap().is_some());
}
