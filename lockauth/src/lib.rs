//! # `lockauth` password verification for screen lockers
//!
//! A screen locker should not need privileges to check a password. This
//! library runs a small helper, `lockauth-helper`, which talks to PAM on the
//! locker's behalf. Every question PAM asks is relayed to a
//! [Responder](trait.Responder.html) supplied by the locker, usually its
//! unlock dialog, and the answer is sent back to the helper. Whether the user
//! was authenticated is decided solely by the exit status of the helper.
//!
//! ```no_run
//! use lockauth::{AuthConfig, PromptStyle};
//!
//! let config = AuthConfig::default();
//! let ok = lockauth::authenticate(&config, "alice", |style: PromptStyle, prompt: &str| {
//!     match style {
//!         PromptStyle::Secret => Some("hunter2".to_string()),
//!         _ => {
//!             println!("{}", prompt);
//!             None
//!         }
//!     }
//! });
//! ```
//!
//! See [lockauth_ipc](../lockauth_ipc/index.html) for the wire protocol.

mod config;
mod driver;
mod error;

pub use crate::config::{AuthConfig, CONFIG_FILE};
pub use crate::driver::{authenticate, check_helper, verify_user, Responder};
pub use crate::error::Error;
pub use lockauth_ipc::PromptStyle;
