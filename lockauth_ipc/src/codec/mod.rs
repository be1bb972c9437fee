//! Reader/writer functions for prompts and replies.
//!
//! The functions operate on any implementor of `std::io::{Read, Write}`, which
//! in practice is one end of a pipe. A single read or write on a pipe may
//! transfer fewer bytes than requested, so every field is transferred in a
//! loop until it is complete, until no progress is made, or until an error
//! occurs. A transfer that stops making progress is reported with the error
//! for the field it was working on.
//!
//! Reading distinguishes a clean end of stream, where the peer closed the pipe
//! before starting a new message, from a message that was cut short. The
//! former is returned as `Ok(None)`, the latter as an error.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(String),
    #[error("short read of message length")]
    LengthRead,
    #[error("message of {len} bytes does not fit in a {capacity} byte buffer")]
    TooLong { len: usize, capacity: usize },
    #[error("short read of message body")]
    MsgRead,
    #[error("short read of message type")]
    TypeRead,
    #[error("short write of message length")]
    LengthWrite,
    #[error("short write of message body")]
    MsgWrite,
    #[error("short write of message type")]
    TypeWrite,
}

impl Error {
    /// The numeric code of this error, as used in log messages.
    pub fn code(&self) -> i32 {
        match self {
            Error::Io(_) => -1,
            Error::LengthRead => -2,
            Error::TooLong { .. } => -3,
            Error::MsgRead => -4,
            Error::TypeRead => -5,
            Error::LengthWrite => -6,
            Error::MsgWrite => -7,
            Error::TypeWrite => -8,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(format!("{}", error))
    }
}

mod sync;
pub use self::sync::{read_msg, read_prompt, write_msg, write_prompt};
