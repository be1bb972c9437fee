use std::{ffi::OsString, path::Path, time::Duration};

use nix::unistd::{access, AccessFlags};

use crate::error::Error;

/// Directory holding the per-service PAM configuration.
pub const PAM_DIR: &str = "/etc/pam.d";

/// Longest accepted service name.
pub const MAX_SERVICE_LEN: usize = 32;

/// How long to stall a user who runs the helper from a terminal.
pub const TTY_DELAY: Duration = Duration::from_secs(10);

/// How long to stall an unprivileged caller asking about another user.
pub const OVERRIDE_DELAY: Duration = Duration::from_secs(5);

/// The positional arguments of the helper: `<service> [<user>]`.
#[derive(Debug, Eq, PartialEq)]
pub struct Args {
    pub service: String,
    pub user: Option<String>,
}

impl Args {
    /// Parse the arguments following the program name.
    pub fn parse<I: IntoIterator<Item = OsString>>(args: I) -> Result<Args, Error> {
        let args = args
            .into_iter()
            .map(|arg| {
                arg.into_string()
                    .map_err(|_| Error::ConfigError("argument is not valid UTF-8".to_string()))
            })
            .collect::<Result<Vec<String>, Error>>()?;

        match args.as_slice() {
            [service] => Ok(Args {
                service: service.clone(),
                user: None,
            }),
            [service, user] => Ok(Args {
                service: service.clone(),
                user: Some(user.clone()),
            }),
            _ => Err(Error::ConfigError(format!(
                "bad number of arguments ({})",
                args.len()
            ))),
        }
    }
}

/// Check that a service name is short, made of harmless characters, and has a
/// readable PAM configuration in `pam_dir`.
pub fn check_service(name: &str, pam_dir: &Path) -> Result<(), Error> {
    if name.is_empty() || name.len() > MAX_SERVICE_LEN {
        return Err(Error::ConfigError(format!(
            "illegal service name '{}': bad length",
            name
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::ConfigError(format!(
            "illegal service name '{}': bad character",
            name
        )));
    }
    access(pam_dir.join(name).as_path(), AccessFlags::R_OK).map_err(|e| {
        Error::ConfigError(format!(
            "illegal service name '{}': unreadable configuration: {}",
            name, e
        ))
    })
}
