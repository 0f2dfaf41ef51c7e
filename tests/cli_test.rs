//! Command dispatch against a mock API

use clap::Parser;
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use treenav::cli::commands::execute_command;
use treenav::cli::Cli;
use treenav::exitcode;
use treenav::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn cli(server: &MockServer, config_dir: &TempDir, args: &[&str]) -> Cli {
    let base_url = server.url("/api");
    let dir = config_dir.path().to_string_lossy().into_owned();
    let mut argv = vec![
        "treenav".to_string(),
        "--base-url".to_string(),
        base_url,
        "-C".to_string(),
        dir,
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    Cli::try_parse_from(argv).expect("valid arguments")
}

#[tokio::test]
async fn given_leaf_node_when_listing_children_then_succeeds() {
    let server = MockServer::start_async().await;
    let children = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/nodes").query_param("parent", "2");
            then.status(404).json_body(json!({"message": "Not found"}));
        })
        .await;
    let dir = TempDir::new().unwrap();

    let result = execute_command(&cli(&server, &dir, &["children", "2"])).await;

    children.assert_async().await;
    assert!(result.is_ok(), "404 means no children: {result:?}");
}

#[tokio::test]
async fn given_server_error_when_listing_children_then_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/nodes").query_param("parent", "2");
            then.status(500);
        })
        .await;
    let dir = TempDir::new().unwrap();

    let err = execute_command(&cli(&server, &dir, &["children", "2"]))
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
}

#[tokio::test]
async fn given_blank_language_when_running_then_usage_error() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();

    let err = execute_command(&cli(&server, &dir, &["--lang", " ", "locales"]))
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}
