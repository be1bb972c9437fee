use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use lockauth::{authenticate, check_helper, verify_user, AuthConfig, Error, PromptStyle};

fn fake(script: &str) -> AuthConfig {
    AuthConfig {
        helper: PathBuf::from(env!("CARGO_BIN_EXE_fakehelper")),
        service: script.to_string(),
        verbose: true,
    }
}

/// Run a scripted conversation, answering prompts from `answers` in order.
fn converse(
    script: &str,
    user: &str,
    answers: &[&str],
) -> (Result<(), Error>, Vec<(PromptStyle, String)>) {
    let mut seen = Vec::new();
    let mut answers = answers.iter();
    let res = verify_user(&fake(script), user, |style: PromptStyle, prompt: &str| {
        seen.push((style, prompt.to_string()));
        answers.next().map(|a| a.to_string())
    });
    (res, seen)
}

#[test]
fn correct_password() {
    let (res, seen) = converse("password", "alice", &["hunter2"]);
    res.expect("authentication failed");
    assert_eq!(seen, vec![(PromptStyle::Secret, "Password: ".to_string())]);
}

#[test]
fn wrong_password() {
    let (res, seen) = converse("password", "alice", &["hunter3"]);
    assert!(matches!(res, Err(Error::Denied(_))), "got {:?}", res);
    assert_eq!(seen.len(), 1);
}

#[test]
fn prompts_arrive_in_order() {
    let (res, seen) = converse("multi", "alice", &["alice", "hunter2"]);
    res.expect("authentication failed");
    assert_eq!(
        seen,
        vec![
            (PromptStyle::Visible, "login: ".to_string()),
            (PromptStyle::Secret, "Password: ".to_string()),
            (PromptStyle::Info, "Welcome".to_string()),
            (PromptStyle::Error, "Account expires soon".to_string()),
        ]
    );
}

#[test]
fn idle_prompts_are_skipped() {
    let (res, seen) = converse("idle", "alice", &["hunter2"]);
    res.expect("authentication failed");
    assert_eq!(seen, vec![(PromptStyle::Secret, "Password: ".to_string())]);
}

#[test]
fn user_is_passed_to_helper() {
    let (res, _) = converse("multi", "bob", &["alice", "hunter2"]);
    assert!(matches!(res, Err(Error::Denied(_))), "got {:?}", res);
}

#[test]
fn failure_without_prompts() {
    let start = Instant::now();
    let (res, seen) = converse("fail", "alice", &[]);
    assert!(matches!(res, Err(Error::Denied(_))), "got {:?}", res);
    assert!(seen.is_empty());
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn success_without_prompts() {
    let (res, seen) = converse("silent", "alice", &[]);
    res.expect("authentication failed");
    assert!(seen.is_empty());
}

#[test]
fn helper_killed_by_signal() {
    let (res, seen) = converse("crash", "alice", &["hunter2"]);
    match res {
        Err(Error::Denied(msg)) => assert!(msg.contains("signal"), "got {}", msg),
        res => panic!("expected denial, got {:?}", res),
    }
    assert_eq!(seen.len(), 1);
}

#[test]
fn truncated_prompt() {
    let (res, seen) = converse("garbage", "alice", &[]);
    assert!(matches!(res, Err(Error::Protocol(_))), "got {:?}", res);
    assert!(seen.is_empty());
}

#[test]
fn oversized_prompt() {
    let (res, seen) = converse("toolong", "alice", &[]);
    assert!(matches!(res, Err(Error::Protocol(_))), "got {:?}", res);
    assert!(seen.is_empty());
}

#[test]
fn unknown_prompt_style() {
    let (res, seen) = converse("badstyle", "alice", &[]);
    assert!(matches!(res, Err(Error::UnknownStyle(9))), "got {:?}", res);
    assert!(seen.is_empty());
}

#[test]
fn opaque_payload_survives() {
    // 1023 bytes: the largest payload that fits, with control characters,
    // multi-byte characters and high bytes.
    let mut secret = String::from("\u{1}\u{7f}\u{ff}");
    while secret.len() + "é".len() <= 1023 {
        secret.push('é');
    }
    while secret.len() < 1023 {
        secret.push('\u{2}');
    }
    assert_eq!(secret.len(), 1023);

    let (res, seen) = converse("echo", "alice", &[secret.as_str()]);
    res.expect("authentication failed");
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1], (PromptStyle::Info, secret));
}

#[test]
fn missing_helper() {
    let config = AuthConfig {
        helper: PathBuf::from("/nonexistent/lockauth-helper"),
        ..AuthConfig::default()
    };
    assert!(check_helper(&config).is_err());
    let res = verify_user(&config, "alice", |_: PromptStyle, _: &str| None);
    assert!(matches!(res, Err(Error::Spawn(_))), "got {:?}", res);
}

#[test]
fn boolean_outcome() {
    assert!(check_helper(&fake("password")).is_ok());
    assert!(authenticate(
        &fake("password"),
        "alice",
        |_: PromptStyle, _: &str| Some("hunter2".to_string())
    ));
    assert!(!authenticate(
        &fake("password"),
        "alice",
        |_: PromptStyle, _: &str| None
    ));
}
