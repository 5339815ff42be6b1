//! Usage errors reported by the compiled binary. None of these reach the
//! network: the command is validated before any client is built.
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_release-helper"))
        .args(args)
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("GITHUB_TOKEN")
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn missing_command_prints_usage_and_fails() {
    let output = run(&[]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("No command selected!"));
    assert!(err.contains("Usage:"));
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_command_lists_all_commands() {
    let output = run(&["frobnicate"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Unknown command: frobnicate"));
    for line in [
        "draft-release <tag-name>",
        "upload-asset <release-id> <asset-path>",
        "upload-all-assets <release-id> <folder-path>",
        "download-all-assets <release-id> <output-path>",
        "publish-release <release-id>",
        "update-release-body <release-id> <body>",
        "get-release <release-id>",
    ] {
        assert!(err.contains(line), "missing {line} in:\n{err}");
    }
}

#[test]
fn wrong_argument_count_names_the_command() {
    let output = run(&["upload-asset", "1"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Wrong number of arguments for command: upload-asset"));
    assert!(err.contains("upload-asset <release-id> <asset-path>"));
    assert_eq!(err.matches("Usage:").count(), 1);
}

#[test]
fn valid_command_without_credentials_fails_on_configuration() {
    let output = run(&["get-release", "1"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("GITHUB_REPOSITORY"));
}
