pub mod session;
mod ffi;

use std::ffi::{CStr, CString};

use pam_sys::PamReturnCode;

pub struct PamError(PamReturnCode);

impl PamError {
    pub fn code(&self) -> PamReturnCode {
        self.0
    }
}

impl std::fmt::Debug for PamError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(fmt)
    }
}

impl std::fmt::Display for PamError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(fmt)
    }
}

impl std::error::Error for PamError {}

impl From<PamReturnCode> for PamError {
    fn from(err: PamReturnCode) -> PamError {
        PamError(err)
    }
}

/// A trait representing the PAM authentification conversation
///
/// PAM authentification is done as a conversation mechanism, in which PAM
/// asks several questions and the client (your code) answers them. This trait
/// is a representation of such a conversation, which one method for each message
/// PAM can send you.
///
/// Returning an error from any of the methods aborts the conversation, which
/// makes the PAM call that started it fail.
pub trait Converse {
    /// PAM requests a value that should be echoed to the user as they type it
    ///
    /// This would typically be the username. The exact question is provided as the
    /// `msg` argument if you wish to display it to your user.
    fn prompt_echo(&self, msg: &CStr) -> Result<CString, ()>;
    /// PAM requests a value that should be typed blindly by the user
    ///
    /// This would typically be the password. The exact question is provided as the
    /// `msg` argument if you wish to display it to your user.
    fn prompt_blind(&self, msg: &CStr) -> Result<CString, ()>;
    /// This is an informational message from PAM
    fn info(&self, msg: &CStr) -> Result<(), ()>;
    /// This is an error message from PAM
    fn error(&self, msg: &CStr) -> Result<(), ()>;
}
