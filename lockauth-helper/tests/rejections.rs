use std::{
    process::{Command, Output, Stdio},
    time::{Duration, Instant},
};

fn helper(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lockauth-helper"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .expect("unable to run helper")
}

fn assert_rejected(args: &[&str]) {
    let start = Instant::now();
    let out = helper(args);
    assert_eq!(out.status.code(), Some(1), "args: {:?}", args);
    assert!(
        out.stdout.is_empty(),
        "helper sent prompts before rejecting {:?}",
        args
    );
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn path_in_service_name() {
    assert_rejected(&["../etc"]);
    assert_rejected(&["../etc", "root"]);
}

#[test]
fn bad_characters_in_service_name() {
    assert_rejected(&["login;id"]);
    assert_rejected(&["pam.d"]);
    assert_rejected(&[""]);
}

#[test]
fn overlong_service_name() {
    assert_rejected(&["a".repeat(33).as_str()]);
}

#[test]
fn missing_service_configuration() {
    assert_rejected(&["lockauth-no-such-service"]);
}

#[test]
fn bad_argument_count() {
    assert_rejected(&[]);
    assert_rejected(&["login", "root", "extra"]);
}
