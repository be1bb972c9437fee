use std::ffi::CStr;
use std::ptr;

use pam_sys::{PamFlag, PamHandle, PamReturnCode};

use super::{ffi::make_conversation, Converse, PamError};

/// A PAM transaction for a single service and user. The transaction is ended
/// when the session is dropped.
pub struct PamSession<'a, C: Converse> {
    handle: &'a mut PamHandle,
    // PAM holds a pointer to this for the lifetime of the handle.
    _converse: Box<C>,
    last_code: PamReturnCode,
}

impl<'a, C: Converse> PamSession<'a, C> {
    pub fn start(service: &str, user: &str, converse: C) -> Result<PamSession<'a, C>, PamError> {
        let converse = Box::new(converse);
        let conv = make_conversation(&*converse);
        let mut pam_handle: *mut PamHandle = ptr::null_mut();

        match pam_sys::start(service, Some(user), &conv, &mut pam_handle) {
            PamReturnCode::SUCCESS if !pam_handle.is_null() => Ok(PamSession {
                handle: unsafe { &mut *pam_handle },
                _converse: converse,
                last_code: PamReturnCode::SUCCESS,
            }),
            PamReturnCode::SUCCESS => Err(PamReturnCode::SYSTEM_ERR.into()),
            code => Err(code.into()),
        }
    }

    pub fn authenticate(&mut self, flags: PamFlag) -> Result<(), PamError> {
        self.last_code = pam_sys::authenticate(self.handle, flags);
        match self.last_code {
            PamReturnCode::SUCCESS => Ok(()),
            code => Err(code.into()),
        }
    }

    pub fn setcred(&mut self, flags: PamFlag) -> Result<(), PamError> {
        // The outcome of the transaction is that of authentication, so
        // last_code is left alone.
        match pam_sys::setcred(self.handle, flags) {
            PamReturnCode::SUCCESS => Ok(()),
            code => Err(code.into()),
        }
    }

    /// A description of the error, as provided by PAM.
    pub fn strerror(&mut self, err: &PamError) -> String {
        let msg = unsafe { pam_sys::raw::pam_strerror(self.handle, err.code() as i32) };
        if msg.is_null() {
            format!("{:?}", err.code())
        } else {
            unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
        }
    }
}

impl<'a, C: Converse> Drop for PamSession<'a, C> {
    fn drop(&mut self) {
        let _ = pam_sys::end(self.handle, self.last_code);
    }
}
