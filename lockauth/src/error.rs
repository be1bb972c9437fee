use std::convert::From;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone)]
pub enum Error {
    #[error("unable to run helper: {0}")]
    Spawn(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("unknown prompt style: {0}")]
    UnknownStyle(i32),

    #[error("authentication denied: {0}")]
    Denied(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(format!("{}", error))
    }
}

impl From<lockauth_ipc::codec::Error> for Error {
    fn from(error: lockauth_ipc::codec::Error) -> Self {
        match error {
            lockauth_ipc::codec::Error::Io(s) => Error::Io(s),
            e => Error::Protocol(format!("{} ({})", e, e.code())),
        }
    }
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Config(error)
    }
}

impl From<ini::ParseError> for Error {
    fn from(error: ini::ParseError) -> Self {
        Error::Config(error.to_string())
    }
}
