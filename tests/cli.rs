//! Command line behavior: exit codes, output placement and JSON formatting

mod common;

use common::{XHS_PAGE, mount_feed, mount_resource};
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Write a config that points the feed client at `server` and keeps downloads fast
fn write_config(dir: &TempDir, server: &MockServer) -> PathBuf {
    let path = dir.path().join("config.json");
    let config = serde_json::json!({
        "feed": { "api_base": server.uri(), "timeout": 5 },
        "download": {
            "timeout": 5,
            "delay_between_requests": 0,
            "retry": { "max_attempts": 1, "delay": 0 }
        }
    });
    std::fs::write(&path, config.to_string()).expect("write config");
    path
}

async fn run_cli(config: &Path, args: &[&str]) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_hotlist-dl"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("run hotlist-dl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[tokio::test]
async fn feed_prints_json_and_succeeds() {
    let server = MockServer::start().await;
    mount_feed(&server, "xiaohongshu", XHS_PAGE).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, &server);

    let output = run_cli(&config, &["feed", "-p", "xhs", "-l", "2"]).await;

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let text = stdout(&output);
    assert_eq!(text.trim_end().lines().count(), 1, "compact JSON is one line");
    let json: serde_json::Value = serde_json::from_str(&text).expect("stdout is JSON");
    assert_eq!(json["platform"], "xhs");
    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn feed_pretty_indents_output() {
    let server = MockServer::start().await;
    mount_feed(&server, "xiaohongshu", XHS_PAGE).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, &server);

    let output = run_cli(&config, &["feed", "-p", "xhs", "--pretty"]).await;

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("\n  \"platform\": \"xhs\""), "{text}");
    let json: serde_json::Value = serde_json::from_str(&text).expect("stdout is JSON");
    assert_eq!(json["count"], 5);
}

#[tokio::test]
async fn feed_writes_output_file() {
    let server = MockServer::start().await;
    mount_feed(&server, "xiaohongshu", XHS_PAGE).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, &server);
    let target = dir.path().join("trending.json");

    let output = run_cli(
        &config,
        &["feed", "-p", "xhs", "-o", target.to_str().expect("utf-8 path")],
    )
    .await;

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(stdout(&output).trim().is_empty(), "JSON goes to the file only");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&target).expect("read output"))
            .expect("file is JSON");
    assert_eq!(json["platform_name"], "xiaohongshu");
}

#[tokio::test]
async fn empty_feed_fails_and_keeps_previous_output() {
    let server = MockServer::start().await;
    mount_feed(&server, "weibo", "nothing").await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, &server);
    let target = dir.path().join("trending.json");
    std::fs::write(&target, "PREVIOUS GOOD DATA").expect("seed output");

    let output = run_cli(
        &config,
        &["feed", "-p", "weibo", "-o", target.to_str().expect("utf-8 path")],
    )
    .await;

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert_eq!(
        std::fs::read_to_string(&target).expect("read output"),
        "PREVIOUS GOOD DATA"
    );
}

#[tokio::test]
async fn empty_feed_prints_nothing_to_stdout() {
    let server = MockServer::start().await;
    mount_feed(&server, "weibo", "nothing").await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, &server);

    let output = run_cli(&config, &["feed", "-p", "weibo"]).await;

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(stdout(&output).trim().is_empty());
}

#[tokio::test]
async fn failed_feed_fetch_exits_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, &server);

    let output = run_cli(&config, &["feed", "-p", "zhihu"]).await;

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stderr).contains("503"));
}

#[tokio::test]
async fn unknown_platform_is_a_usage_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, &server);

    let output = run_cli(&config, &["feed", "-p", "myspace"]).await;

    assert_ne!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown platform"));
}

#[tokio::test]
async fn download_reports_and_exits_by_outcome() {
    let server = MockServer::start().await;
    mount_resource(&server, "/a.png", b"png").await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, &server);
    let out = dir.path().join("images");
    let out_arg = out.to_str().expect("utf-8 path");
    let good = format!("{}/a.png", server.uri());
    let missing = format!("{}/missing.png", server.uri());

    let output = run_cli(&config, &["download", "-d", out_arg, &good]).await;
    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("report");
    assert_eq!(report["total"], 1);
    assert_eq!(report["success"], 1);
    assert!(out.join("file_001.png").exists());

    let output = run_cli(
        &config,
        &["download", "-d", out_arg, "-t", "img_{0}", &good, &missing],
    )
    .await;
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("report");
    assert_eq!(report["failed"], 1);
    assert_eq!(report["failed_urls"][0], missing.as_str());
    assert!(out.join("img_1.png").exists());
}

#[tokio::test]
async fn download_reads_url_file() {
    let server = MockServer::start().await;
    mount_resource(&server, "/one.jpg", b"1").await;
    mount_resource(&server, "/two.gif", b"2").await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, &server);
    let list = dir.path().join("urls.txt");
    std::fs::write(
        &list,
        format!(
            "# covers\n{}/one.jpg\n\n  {}/two.gif  \n",
            server.uri(),
            server.uri()
        ),
    )
    .expect("write url list");
    let out = dir.path().join("out");

    let output = run_cli(
        &config,
        &[
            "download",
            "--url-file",
            list.to_str().expect("utf-8 path"),
            "-d",
            out.to_str().expect("utf-8 path"),
        ],
    )
    .await;

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(out.join("file_001.jpg").exists());
    assert!(out.join("file_002.gif").exists());
}
