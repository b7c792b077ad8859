//! CLI tests for exit codes.
//!
//! Spawns the courier binary and verifies that `init` and failures detected
//! before or during the initial fetch map to the documented exit codes.

use std::fs;
use std::process::{Command, Output};

use courier::exit_codes;
use courier::io::config::{CourierConfig, load_config, write_config};

fn courier(dir: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_courier"))
        .current_dir(dir)
        .env_remove("COURIER_TOKEN")
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("run courier")
}

#[test]
fn missing_token_exits_before_any_request() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = courier(temp.path(), &["show", "1"]);

    assert_eq!(output.status.code(), Some(exit_codes::MISSING_CREDENTIAL));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing bearer credential"), "{stderr}");
}

#[test]
fn invalid_config_exits_with_invalid_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(
        temp.path().join("courier.toml"),
        "api_base_url = \"ftp://routes.example.com\"\n",
    )
    .expect("write config");

    let output = courier(temp.path(), &["--token", "abc", "show", "1"]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn unreachable_api_exits_with_network_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = CourierConfig {
        api_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
        ..CourierConfig::default()
    };
    write_config(&temp.path().join("courier.toml"), &config).expect("write config");

    let output = courier(temp.path(), &["--token", "abc", "show", "1"]);

    assert_eq!(output.status.code(), Some(exit_codes::NETWORK));
    assert!(output.stdout.is_empty());
}

#[test]
fn init_writes_default_config_once() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = courier(temp.path(), &["init"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let written = load_config(&temp.path().join("courier.toml")).expect("load config");
    assert_eq!(written, CourierConfig::default());

    let again = courier(temp.path(), &["init"]);
    assert_eq!(again.status.code(), Some(exit_codes::INVALID));

    let forced = courier(temp.path(), &["init", "--force"]);
    assert_eq!(forced.status.code(), Some(exit_codes::OK));
}
