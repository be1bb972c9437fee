use std::time::Duration;

use nix::unistd::{Uid, User};

use crate::{config::OVERRIDE_DELAY, error::Error};

/// The user to authenticate, and how long to wait before doing so.
#[derive(Debug, Eq, PartialEq)]
pub struct Target {
    pub user: String,
    pub delay: Option<Duration>,
}

/// Look up the account name of a uid.
pub fn account_name(uid: Uid) -> Result<Option<String>, Error> {
    Ok(User::from_uid(uid)?.map(|u| u.name))
}

/// The helper is meant to be driven over pipes. Only root may use it from a
/// terminal.
pub fn interactive_misuse(stdin_is_tty: bool, caller: Uid) -> bool {
    stdin_is_tty && !caller.is_root()
}

/// Pick the user to authenticate. The caller's own account is the default.
/// Asking about anyone else slows unprivileged callers down, so that the
/// helper makes a poor password guessing oracle.
pub fn resolve_target(
    caller: Option<&str>,
    requested: Option<&str>,
    privileged: bool,
) -> Result<Target, Error> {
    match (caller, requested) {
        (Some(caller), None) => Ok(Target {
            user: caller.to_string(),
            delay: None,
        }),
        (Some(caller), Some(requested)) if caller == requested => Ok(Target {
            user: caller.to_string(),
            delay: None,
        }),
        (_, Some(requested)) => Ok(Target {
            user: requested.to_string(),
            delay: if privileged {
                None
            } else {
                Some(OVERRIDE_DELAY)
            },
        }),
        (None, None) => Err(Error::AuthError(
            "unable to determine the calling user".to_string(),
        )),
    }
}
