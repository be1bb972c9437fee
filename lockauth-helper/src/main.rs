use std::{
    env,
    ffi::OsString,
    fs::File,
    io::{self, IsTerminal},
    os::unix::io::AsFd,
    path::Path,
    process, thread,
};

use log::{error, info};
use nix::{
    fcntl::{open, OFlag},
    sys::stat::Mode,
    unistd::{close, getuid, Uid},
};

mod auth;
mod config;
mod conv;
mod error;
mod identity;
mod pam;
mod signals;
mod syslog;

use crate::{config::Args, conv::RelayConv, error::Error};

const PASSED: i32 = 0;
const FAILED: i32 = 1;

/// Make sure that fds 0, 1 and 2 are open, so that nothing we open later ends
/// up being mistaken for one of them.
fn connect_std_fds() -> Result<(), Error> {
    loop {
        let fd = open("/dev/null", OFlag::O_RDWR, Mode::empty())?;
        if fd > 2 {
            close(fd)?;
            return Ok(());
        }
    }
}

fn run(uid: Uid, args: impl IntoIterator<Item = OsString>) -> Result<(), Error> {
    let args = Args::parse(args)?;

    config::check_service(&args.service, Path::new(config::PAM_DIR))?;

    if identity::interactive_misuse(io::stdin().is_terminal(), uid) {
        eprintln!(
            "This binary is not designed for running in this way\n\
             -- the system administrator has been informed"
        );
        thread::sleep(config::TTY_DELAY);
        return Err(Error::Error(format!(
            "inappropriate use of helper binary [UID={}]",
            uid
        )));
    }

    let caller = identity::account_name(uid)?;
    let target = identity::resolve_target(caller.as_deref(), args.user.as_deref(), uid.is_root())?;
    if let Some(delay) = target.delay {
        thread::sleep(delay);
    }

    let input = File::from(io::stdin().as_fd().try_clone_to_owned()?);
    let output = File::from(io::stdout().as_fd().try_clone_to_owned()?);
    let conv = RelayConv::new(input, output);

    auth::authenticate(&args.service, &target.user, conv)?;
    info!("authenticated {} for {}", target.user, args.service);
    Ok(())
}

fn main() {
    let uid = getuid();

    if connect_std_fds().is_err() {
        process::exit(FAILED);
    }

    let mut args = env::args_os();
    let program = args
        .next()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "lockauth-helper".to_string());

    if let Err(e) = syslog::init(&program) {
        eprintln!("{}", e);
        process::exit(FAILED);
    }

    if let Err(e) = signals::setup() {
        error!("{}", e);
        process::exit(FAILED);
    }

    let code = match run(uid, args) {
        Ok(()) => PASSED,
        Err(e) => {
            error!("{}", e);
            FAILED
        }
    };
    process::exit(code);
}
