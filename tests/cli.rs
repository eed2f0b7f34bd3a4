use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("transpress")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("channel"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("formats"));
}

#[test]
fn test_formats_lists_styles_and_renderers() {
    Command::cargo_bin("transpress")
        .unwrap()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("brainrot"))
        .stdout(predicate::str::contains("explainer"))
        .stdout(predicate::str::contains("styled"));
}

#[test]
fn test_unknown_style_is_rejected() {
    Command::cargo_bin("transpress")
        .unwrap()
        .args(["channel", "SomeChannel", "--style", "haiku"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("haiku"));
}
