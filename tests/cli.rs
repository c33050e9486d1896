use assert_cmd::Command;
use predicates::prelude::*;

/// Missing config file must abort before any network call, with a message
/// on stderr and a non-zero exit code.
#[test]
fn copy_cli_fails_cleanly_for_missing_config_file() {
    let mut cmd = Command::cargo_bin("biblib-copy").expect("Binary exists");

    cmd.arg("copy").arg("--config").arg("/no/such/config.yml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn copy_cli_help_mentions_the_copy_subcommand() {
    let mut cmd = Command::cargo_bin("biblib-copy").expect("Binary exists");

    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("copy").and(predicate::str::contains("config")));
}
