use log::warn;
use pam_sys::PamFlag;

use crate::{
    error::Error,
    pam::{session::PamSession, Converse},
};

/// Run a single PAM authentication for `user` against `service`, relaying the
/// conversation through `conv`.
pub fn authenticate<C: Converse>(service: &str, user: &str, conv: C) -> Result<(), Error> {
    let mut pam = PamSession::start(service, user, conv).map_err(|e| {
        Error::AuthError(format!("pam_start({}, {}) failed: {}", service, user, e))
    })?;

    if let Err(e) = pam.authenticate(PamFlag::NONE) {
        return Err(Error::AuthError(format!(
            "pam_authenticate({}, {}): {}",
            service,
            user,
            pam.strerror(&e)
        )));
    }

    // Failing to refresh keeps the old credentials in place.
    if let Err(e) = pam.setcred(PamFlag::REFRESH_CRED) {
        warn!("pam_setcred({}, {}): {}", service, user, pam.strerror(&e));
    }

    Ok(())
}
