use std::fs;

use assert_cmd::Command;
use httpmock::prelude::*;
use tempfile::TempDir;

const BIN: &str = "stmctl";

const ONE_BUS: &str = r##"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"id":"bus1","linea":"405","destinoDesc":"PEÑAROL","sublinea":"PORTONES - PEÑAROL"},"geometry":{"type":"Point","coordinates":[-56.20,-34.91]}}]}"##;

/// Config and sources files pointing at `url`.
///
fn setup(url: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();

    fs::write(dir.path().join("config.hcl"), "version = 1\nline = \"405\"\n").unwrap();
    let sources = format!(
        r##"
version = 1

site "stm" {{
  format   = "stm-online"
  base_url = "{url}"
  operator = "50"
  routes = {{
    get = "/buses/rest/stm-online"
  }}
}}
"##
    );
    fs::write(dir.path().join("sources.hcl"), sources).unwrap();
    dir
}

fn stmctl(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.arg("-c")
        .arg(dir.path().join("config.hcl"))
        .arg("-S")
        .arg(dir.path().join("sources.hcl"));
    cmd
}

#[test]
fn test_empty_args() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.assert().failure();
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.arg("-h").assert().success();
}

#[test]
fn test_help_keyword() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.arg("help").assert().success();
}

#[test]
fn test_bad_keyword() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.arg("bouh").assert().failure();
}

#[test]
fn test_version_keyword() {
    let dir = setup("http://127.0.0.1:9");
    stmctl(&dir).arg("version").assert().success();
}

#[test]
fn test_list_empty() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.arg("list").assert().failure();
}

#[test]
fn test_list_things() {
    let dir = setup("http://127.0.0.1:9");
    for what in ["formats", "locations", "sources"] {
        stmctl(&dir).arg("list").arg(what).assert().success();
    }
}

#[test]
fn test_completion() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.arg("completion").arg("bash").assert().success();
}

#[test]
fn test_missing_config() {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.arg("-c")
        .arg("/nonexistent/config.hcl")
        .arg("list")
        .arg("sources")
        .assert()
        .failure();
}

#[test]
fn test_track_one_bus() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path("/buses/rest/stm-online")
            .body_contains("\"empresa\":\"50\"")
            .body_contains("\"lineas\":[\"405\"]");
        then.status(200)
            .header("content-type", "application/json")
            .body(ONE_BUS);
    });
    let dir = setup(&server.base_url());

    let out = stmctl(&dir)
        .args(["track", "--at", "-34.90,-56.18", "-s", "bus1", "-t", "10"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&out.get_output().stdout).to_string();

    assert!(stdout.contains("Line '405': 1 vehicle(s)"));
    assert!(stdout.contains("self"));
    assert!(stdout.contains("bus1"));
    assert!(stdout.contains("Camera: (-34.91000, -56.20000) span 0.02x0.02"));
    m.assert();
}

#[test]
fn test_track_server_error() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST).path("/buses/rest/stm-online");
        then.status(503).body("maintenance");
    });
    let dir = setup(&server.base_url());

    stmctl(&dir)
        .args(["track", "-L", "centro", "-t", "10"])
        .assert()
        .failure();
    m.assert();
}

#[test]
fn test_track_no_position() {
    let dir = setup("http://127.0.0.1:9");

    stmctl(&dir)
        .args(["track", "-l", "405", "-t", "10"])
        .assert()
        .failure();
}
