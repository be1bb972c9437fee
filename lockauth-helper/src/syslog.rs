use std::ffi::CString;

use libc::{c_char, c_int};
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::error::Error;

/// A logger writing to the authentication facility of syslog, which is where
/// administrators look for failed and suspicious authentication attempts.
pub struct SyslogLogger {
    ident: CString,
}

impl SyslogLogger {
    fn priority(level: Level) -> c_int {
        match level {
            Level::Error => libc::LOG_ERR,
            Level::Warn => libc::LOG_WARNING,
            Level::Info => libc::LOG_NOTICE,
            Level::Debug | Level::Trace => libc::LOG_DEBUG,
        }
    }
}

impl Log for SyslogLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = format!("{}", record.args()).replace('\0', "");
        let msg = match CString::new(msg) {
            Ok(msg) => msg,
            Err(_) => return,
        };
        unsafe {
            libc::openlog(
                self.ident.as_ptr(),
                libc::LOG_CONS | libc::LOG_PID,
                libc::LOG_AUTH,
            );
            libc::syslog(
                Self::priority(record.level()),
                b"%s\0".as_ptr() as *const c_char,
                msg.as_ptr(),
            );
            libc::closelog();
        }
    }

    fn flush(&self) {}
}

/// Install the syslog logger, identifying messages with the basename of
/// `program`.
pub fn init(program: &str) -> Result<(), Error> {
    let name = program.rsplit('/').next().unwrap_or(program);
    let ident = CString::new(name)?;
    log::set_boxed_logger(Box::new(SyslogLogger { ident }))
        .map_err(|e| format!("unable to install logger: {}", e))?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}
