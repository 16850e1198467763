//! Startup integration tests
//!
//! Drive `startup::run` from files on disk, the way the binary does.

use clap::Parser;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vkfetch::app::cli::args::Args;
use vkfetch::app::input::InputError;
use vkfetch::app::startup::{exit_code, run, StartupError, EXIT_OK, EXIT_PARTIAL};
use vkfetch::core::shutdown::ShutdownCoordinator;
use vkfetch::harvest::api::WorkerState;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["vkfetch"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_api_abandons_every_user() {
    let dir = TempDir::new().unwrap();
    let tokens = write(dir.path(), "tokens.txt", "t1\n\nt2\n");
    let user_ids = write(dir.path(), "ids.txt", "1\n2\n3\n");
    let output = dir.path().join("out.txt");

    let config = args(&[
        "-t",
        tokens.to_str().unwrap(),
        "-i",
        user_ids.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-e",
        "1",
        "--api-url",
        "http://127.0.0.1:9/method",
        "--request-timeout",
        "5",
    ])
    .resolve()
    .unwrap();

    let summary = run(&config, &ShutdownCoordinator::new()).await.unwrap();

    assert_eq!(summary.total_items, 3);
    assert_eq!(summary.abandoned(), 3);
    assert_eq!(summary.workers.len(), 2);
    assert_eq!(exit_code(&summary, false), EXIT_OK);
    assert_eq!(exit_code(&summary, true), EXIT_PARTIAL);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
}

#[tokio::test]
async fn test_missing_tokens_file_fails_before_harvest() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.txt");
    let config = args(&[
        "-t",
        dir.path().join("absent.txt").to_str().unwrap(),
        "-u",
        "1",
        "-o",
        output.to_str().unwrap(),
    ])
    .resolve()
    .unwrap();

    let err = run(&config, &ShutdownCoordinator::new()).await.unwrap_err();
    assert!(matches!(
        err,
        StartupError::Input(InputError::Unreadable { .. })
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_blank_tokens_file_completes_without_work() {
    let dir = TempDir::new().unwrap();
    let tokens = write(dir.path(), "tokens.txt", "\n  \n");
    let config = args(&[
        "-t",
        tokens.to_str().unwrap(),
        "-u",
        "1",
        "-o",
        dir.path().join("out.txt").to_str().unwrap(),
    ])
    .resolve()
    .unwrap();

    let summary = run(&config, &ShutdownCoordinator::new()).await.unwrap();
    assert!(summary.workers.is_empty());
    assert_eq!(summary.abandoned(), 1);
    assert_eq!(exit_code(&summary, false), EXIT_OK);
}

#[tokio::test]
async fn test_empty_id_file_completes_without_work() {
    let dir = TempDir::new().unwrap();
    let tokens = write(dir.path(), "tokens.txt", "t1\nt2\n");
    let user_ids = write(dir.path(), "ids.txt", "");
    let output = dir.path().join("out.txt");
    let config = args(&[
        "-t",
        tokens.to_str().unwrap(),
        "-i",
        user_ids.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .resolve()
    .unwrap();

    let summary = run(&config, &ShutdownCoordinator::new()).await.unwrap();
    assert_eq!(summary.total_items, 0);
    assert!(summary.is_complete());
    assert_eq!(summary.workers_in(WorkerState::Done), 2);
    assert_eq!(exit_code(&summary, true), EXIT_OK);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
}

#[tokio::test]
async fn test_bad_user_id_line_is_reported_with_line_number() {
    let dir = TempDir::new().unwrap();
    let tokens = write(dir.path(), "tokens.txt", "t1\n");
    let user_ids = write(dir.path(), "ids.txt", "1\n2 3\n");
    let config = args(&[
        "-t",
        tokens.to_str().unwrap(),
        "-i",
        user_ids.to_str().unwrap(),
        "-o",
        dir.path().join("out.txt").to_str().unwrap(),
    ])
    .resolve()
    .unwrap();

    match run(&config, &ShutdownCoordinator::new()).await.unwrap_err() {
        StartupError::Input(InputError::InvalidItem { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
}
