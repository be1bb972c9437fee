use std::{
    io::{Read, Write},
    os::unix::process::ExitStatusExt,
    process::{Child, Command, ExitStatus, Stdio},
};

use log::{error, info, log, Level};
use nix::unistd::{access, AccessFlags};

use lockauth_ipc::{codec, scrambler::Scrambler, PromptStyle, IDLE_TAG, MAX_MESSAGE};

use crate::{config::AuthConfig, error::Error};

/// Responder answers the prompts of an authentication attempt. This is where
/// the lock dialog plugs in.
pub trait Responder {
    /// Answer a prompt. For informational and error prompts the answer is
    /// ignored by the helper, and `None` is a fine answer. `None` is sent as
    /// an empty reply.
    fn respond(&mut self, style: PromptStyle, prompt: &str) -> Option<String>;
}

impl<F> Responder for F
where
    F: FnMut(PromptStyle, &str) -> Option<String>,
{
    fn respond(&mut self, style: PromptStyle, prompt: &str) -> Option<String> {
        self(style, prompt)
    }
}

/// Check that the helper can be run. Without it, no password will ever be
/// accepted.
pub fn check_helper(config: &AuthConfig) -> Result<(), Error> {
    access(config.helper.as_path(), AccessFlags::X_OK).map_err(|e| {
        Error::Config(format!(
            "{} is not executable: {}, password authentication will not work",
            config.helper.display(),
            e
        ))
    })
}

fn describe(status: ExitStatus) -> String {
    match (status.code(), status.signal()) {
        (Some(code), _) => format!("helper exited with status {}", code),
        (None, Some(sig)) => format!("helper killed by signal {}", sig),
        (None, None) => format!("helper ended with {}", status),
    }
}

/// Answer prompts from the helper until it goes away.
fn relay<P: Read, A: Write, R: Responder>(
    child: &mut Child,
    prompts: &mut P,
    replies: &mut A,
    responder: &mut R,
) -> Result<(), Error> {
    let mut buf = [0; MAX_MESSAGE];
    while child.try_wait()?.is_none() {
        let (tag, len) = match codec::read_prompt(prompts, &mut buf) {
            Ok(Some(prompt)) => prompt,
            // The helper closed its end and is about to exit.
            Ok(None) => break,
            Err(e) => {
                error!("error reading prompt ({}): {}", e.code(), e);
                return Err(e.into());
            }
        };
        if tag == IDLE_TAG {
            continue;
        }
        let style = PromptStyle::from_tag(tag).ok_or(Error::UnknownStyle(tag))?;
        let prompt = String::from_utf8_lossy(&buf[..len]).into_owned();

        let mut answer = responder.respond(style, &prompt).unwrap_or_default();
        let res = codec::write_msg(replies, answer.as_bytes());
        answer.scramble();
        if let Err(e) = res {
            error!("error writing prompt reply ({}): {}", e.code(), e);
            return Err(e.into());
        }
    }
    Ok(())
}

/// Verify the password of `username` by running the helper, which asks PAM.
/// Each prompt PAM raises is passed to `responder`, and its answer sent back.
///
/// Returns `Ok(())` only if the helper exits successfully and the
/// conversation was well-formed.
pub fn verify_user<R: Responder>(
    config: &AuthConfig,
    username: &str,
    mut responder: R,
) -> Result<(), Error> {
    let level = if config.verbose {
        Level::Info
    } else {
        Level::Debug
    };
    log!(
        level,
        "running {} {} {}",
        config.helper.display(),
        config.service,
        username
    );

    let mut child = Command::new(&config.helper)
        .arg(&config.service)
        .arg(username)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| Error::Spawn(format!("{}: {}", config.helper.display(), e)))?;

    let relayed = match (child.stdin.take(), child.stdout.take()) {
        (Some(mut replies), Some(mut prompts)) => {
            relay(&mut child, &mut prompts, &mut replies, &mut responder)
        }
        _ => Err(Error::Spawn("helper pipes missing".to_string())),
    };

    // Both pipe ends are closed by now, so the helper cannot block on us.
    let status = child.wait()?;
    log!(level, "{}", describe(status));
    relayed?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Denied(describe(status)))
    }
}

/// Like [verify_user](fn.verify_user.html), but only reports whether the user
/// was authenticated. Errors are logged.
pub fn authenticate<R: Responder>(config: &AuthConfig, username: &str, responder: R) -> bool {
    match verify_user(config, username, responder) {
        Ok(()) => true,
        Err(Error::Denied(e)) => {
            info!("authentication of {} failed: {}", username, e);
            false
        }
        Err(e) => {
            error!("authentication of {} failed: {}", username, e);
            false
        }
    }
}
