//! CLI end-to-end tests
//!
//! Tests for the t2s command-line interface.

mod common;

use assert_cmd::prelude::*;
use common::{speech_response, spliced};
use predicates::prelude::*;
use std::fs;
use assert_cmd::Command;
use tempfile::tempdir;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a command for the t2s binary, isolated from any config in the cwd
#[allow(deprecated)]
fn t2s_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("t2s").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_flag() {
    let dir = tempdir().unwrap();
    t2s_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--speaker"));
}

#[test]
fn test_cli_version_flag() {
    let dir = tempdir().unwrap();
    t2s_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("t2s"));
}

#[test]
fn test_cli_missing_key_fails() {
    let dir = tempdir().unwrap();
    t2s_cmd(dir.path())
        .write_stdin("привет")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key"));
}

#[test]
fn test_cli_missing_input_file_fails() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.mp3");
    t2s_cmd(dir.path())
        .args(["-k", "key", "-i", "does-not-exist.txt", "-o"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.txt"));

    assert!(!output.exists());
}

#[test]
fn test_cli_rejects_zero_limit() {
    let dir = tempdir().unwrap();
    t2s_cmd(dir.path())
        .args(["-k", "key", "-l", "0"])
        .write_stdin("текст")
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit"));
}

#[test]
fn test_cli_rejects_unknown_speaker() {
    let dir = tempdir().unwrap();
    t2s_cmd(dir.path())
        .args(["-k", "key", "-s", "robot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("robot"));
}

#[test]
fn test_cli_reads_config_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("t2s.toml"), "[dispatch]\nattempts = 0\n").unwrap();

    t2s_cmd(dir.path())
        .args(["-k", "key"])
        .write_stdin("текст")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Attempt count"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_synthesizes_to_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("key", "secret"))
        .and(query_param("speaker", "jane"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(speech_response(5, 3)))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let input = dir.path().join("text.txt");
    let output = dir.path().join("speech.mp3");
    fs::write(&input, "первый второй третий").unwrap();

    let url = format!("{}/generate", server.uri());
    let dir_path = dir.path().to_path_buf();
    let input_arg = input.clone();
    let output_arg = output.clone();
    let assert = tokio::task::spawn_blocking(move || {
        t2s_cmd(&dir_path)
            .args(["-k", "secret", "-s", "jane", "--url", url.as_str()])
            .arg("-i")
            .arg(&input_arg)
            .arg("-o")
            .arg(&output_arg)
            .assert()
    })
    .await
    .unwrap();

    assert.success();
    assert_eq!(fs::read(&output).unwrap(), spliced(5, 3));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_writes_audio_to_stdout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(speech_response(9, 1)))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let url = format!("{}/generate", server.uri());
    let dir_path = dir.path().to_path_buf();
    let assert = tokio::task::spawn_blocking(move || {
        t2s_cmd(&dir_path)
            .args(["-k", "secret", "--url", url.as_str()])
            .write_stdin("слово")
            .assert()
    })
    .await
    .unwrap();

    assert.success().stdout(spliced(9, 1));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_failed_segment_still_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let url = format!("{}/generate", server.uri());
    let dir_path = dir.path().to_path_buf();
    let assert = tokio::task::spawn_blocking(move || {
        t2s_cmd(&dir_path)
            .args(["-k", "secret", "--url", url.as_str()])
            .write_stdin("слово")
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("HTTP 500"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_fail_fast_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let url = format!("{}/generate", server.uri());
    let dir_path = dir.path().to_path_buf();
    let assert = tokio::task::spawn_blocking(move || {
        t2s_cmd(&dir_path)
            .args(["-k", "secret", "--fail-fast", "--url", url.as_str()])
            .write_stdin("слово")
            .assert()
    })
    .await
    .unwrap();

    assert
        .failure()
        .stderr(predicate::str::contains("dispatch aborted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_accepts_invalid_utf8_input() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("text", "\u{FFFD} a"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(speech_response(4, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let url = format!("{}/generate", server.uri());
    let dir_path = dir.path().to_path_buf();
    let assert = tokio::task::spawn_blocking(move || {
        t2s_cmd(&dir_path)
            .args(["-k", "secret", "--url", url.as_str()])
            .write_stdin(vec![0xC0, b' ', b'a'])
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(spliced(4, 1))
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_drops_segment_that_never_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("text", "one "))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(speech_response(1, 2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("text", "three"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(speech_response(3, 2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("text", "two "))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(speech_response(2, 2))
                .set_delay(std::time::Duration::from_secs(10)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("t2s.toml"), "[dispatch]\nmax_segment_bytes = 4\n").unwrap();

    let url = format!("{}/generate", server.uri());
    let dir_path = dir.path().to_path_buf();
    let assert = tokio::task::spawn_blocking(move || {
        t2s_cmd(&dir_path)
            .args(["-k", "secret", "-t", "1", "-a", "2", "--url", url.as_str()])
            .write_stdin("one two three")
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout([spliced(1, 2), spliced(3, 2)].concat())
        .stderr(predicate::str::contains("Retrying segment"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_fail_fast_leaves_output_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let existing = dir.path().join("existing.mp3");
    let fresh = dir.path().join("fresh.mp3");
    fs::write(&existing, b"previous run").unwrap();

    let url = format!("{}/generate", server.uri());
    let dir_path = dir.path().to_path_buf();
    let (existing_arg, fresh_arg) = (existing.clone(), fresh.clone());
    let (into_existing, into_fresh) = tokio::task::spawn_blocking(move || {
        let run = |output: &std::path::Path| {
            t2s_cmd(&dir_path)
                .args(["-k", "secret", "--fail-fast", "--url", url.as_str()])
                .arg("-o")
                .arg(output)
                .write_stdin("слово")
                .assert()
        };
        (run(&existing_arg), run(&fresh_arg))
    })
    .await
    .unwrap();

    into_existing.failure();
    into_fresh.failure();
    assert_eq!(fs::read(&existing).unwrap(), b"previous run");
    assert!(!fresh.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_overwrites_longer_output_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(speech_response(6, 1)))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("speech.mp3");
    fs::write(&output, vec![0xAA; 10_000]).unwrap();

    let url = format!("{}/generate", server.uri());
    let dir_path = dir.path().to_path_buf();
    let output_arg = output.clone();
    let assert = tokio::task::spawn_blocking(move || {
        t2s_cmd(&dir_path)
            .args(["-k", "secret", "--url", url.as_str()])
            .arg("-o")
            .arg(&output_arg)
            .write_stdin("слово")
            .assert()
    })
    .await
    .unwrap();

    assert.success();
    assert_eq!(fs::read(&output).unwrap(), spliced(6, 1));
}
