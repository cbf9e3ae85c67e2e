use assert_cmd::Command;
use predicates::prelude::*;
use std::{fs, io::Write};
use tempfile::tempdir;

#[test]
fn tansy_eval_prints_the_result() {
    let mut cmd = Command::cargo_bin("tansy").expect("binary exists");
    cmd.arg("eval").arg("(+ 1 2 3)");
    cmd.assert().success().stdout(predicate::str::contains("6"));
}

#[test]
fn tansy_run_executes_a_script() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("greeting.tansy");
    let mut file = fs::File::create(&script).expect("create script");
    writeln!(file, r#"(print (str "hello from " "tansy"))"#).expect("write script");
    drop(file);

    let mut cmd = Command::cargo_bin("tansy").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hello from tansy"));
}

#[test]
fn tansy_eval_env_lists_builtins() {
    let mut cmd = Command::cargo_bin("tansy").expect("binary exists");
    cmd.arg("eval").arg("(env)");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("defun"));
}

#[test]
fn exit_sets_the_process_status() {
    let mut cmd = Command::cargo_bin("tansy").expect("binary exists");
    cmd.arg("eval").arg("(exit 4)");
    cmd.assert().code(4);
}

#[test]
fn undefined_symbols_fail_the_command() {
    let mut cmd = Command::cargo_bin("tansy").expect("binary exists");
    cmd.arg("eval").arg("(boom)");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("boom"));
}
