//! Behavioural smoke tests for the CLI entrypoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn cli_without_arguments_shows_usage_and_fails() {
    let mut cmd = cargo_bin_cmd!("spinup");
    cmd.assert().failure().stderr(contains("Usage"));
}

#[test]
fn cli_help_lists_every_action() {
    let mut cmd = cargo_bin_cmd!("spinup");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("create"))
        .stdout(contains("delete"))
        .stdout(contains("list-keys"));
}

#[test]
fn delete_requires_an_instance_id() {
    let mut cmd = cargo_bin_cmd!("spinup");
    cmd.arg("delete");
    cmd.assert().failure().stderr(contains("INSTANCE_ID"));
}

#[test]
fn create_without_token_fails_before_any_request() {
    let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let mut cmd = cargo_bin_cmd!("spinup");
    cmd.current_dir(dir.path());
    cmd.env("VULTR_API_KEY", "");
    cmd.arg("create");
    cmd.assert().failure().stderr(contains("configuration"));
}
