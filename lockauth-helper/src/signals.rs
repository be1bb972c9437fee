use libc::c_int;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::error::Error;

/// Signals that indicate a bug in the helper or in a PAM module. They are
/// logged once, and the helper exits with the signal number.
const FAULT_SIGNALS: [Signal; 4] = [
    Signal::SIGILL,
    Signal::SIGTRAP,
    Signal::SIGBUS,
    Signal::SIGSEGV,
];

/// Signals aimed at the process group of our caller. The helper must finish
/// or fail the authentication on its own terms, so these are ignored.
const IGNORED_SIGNALS: [Signal; 5] = [
    Signal::SIGTERM,
    Signal::SIGHUP,
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGALRM,
];

extern "C" fn fault_handler(sig: c_int) {
    if sig > 0 {
        // Process state is suspect, so stay with plain libc calls.
        unsafe {
            libc::syslog(
                libc::LOG_AUTH | libc::LOG_NOTICE,
                b"caught signal %d.\0".as_ptr() as *const libc::c_char,
                sig,
            );
            libc::_exit(sig);
        }
    }
}

pub fn setup() -> Result<(), Error> {
    let fault = SigAction::new(
        SigHandler::Handler(fault_handler),
        SaFlags::SA_RESETHAND,
        SigSet::empty(),
    );
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());

    for sig in FAULT_SIGNALS.iter() {
        unsafe { sigaction(*sig, &fault) }
            .map_err(|e| format!("unable to catch {}: {}", sig, e))?;
    }
    for sig in IGNORED_SIGNALS.iter() {
        unsafe { sigaction(*sig, &ignore) }
            .map_err(|e| format!("unable to ignore {}: {}", sig, e))?;
    }
    Ok(())
}
