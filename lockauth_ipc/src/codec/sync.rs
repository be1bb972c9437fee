//! Synchronous reader/writer implementation, operating on an implementor of std::io::{Read, Write}.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::os::unix::io::AsFd;
//! use lockauth_ipc::{codec, PromptStyle, MAX_MESSAGE};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut output = File::from(std::io::stdout().as_fd().try_clone_to_owned()?);
//!     let mut input = File::from(std::io::stdin().as_fd().try_clone_to_owned()?);
//!     codec::write_prompt(&mut output, PromptStyle::Secret.tag(), b"Password:")?;
//!     let mut buf = [0; MAX_MESSAGE];
//!     if let Some(len) = codec::read_msg(&mut input, &mut buf)? {
//!         println!("got {} bytes", len);
//!     }
//!     Ok(())
//! }
//! ```

use std::io::{self, Read, Write};
use std::mem::size_of;

use libc::c_int;

use crate::codec::Error;

/// Read until `buf` is full, the stream stops producing data, or an error
/// occurs. Returns the number of bytes read.
fn read_full<T: Read>(stream: &mut T, buf: &mut [u8]) -> io::Result<usize> {
    let mut done = 0;
    while done < buf.len() {
        match stream.read(&mut buf[done..]) {
            Ok(0) => break,
            Ok(n) => done += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(done)
}

/// Write until all of `buf` is written, the stream stops accepting data, or an
/// error occurs. Returns the number of bytes written.
fn write_full<T: Write>(stream: &mut T, buf: &[u8]) -> io::Result<usize> {
    let mut done = 0;
    while done < buf.len() {
        match stream.write(&buf[done..]) {
            Ok(0) => break,
            Ok(n) => done += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(done)
}

/// Read and throw away up to `len` bytes, to skip the body of a rejected
/// message.
fn discard<T: Read>(stream: &mut T, len: usize) -> io::Result<u64> {
    io::copy(&mut stream.by_ref().take(len as u64), &mut io::sink())
}

/// Read a reply message into `buf`.
///
/// Returns `Ok(None)` if the stream ended cleanly before the message started.
/// Otherwise, the payload is stored at the start of `buf`, followed by a NUL
/// byte, and its length is returned. The payload must be strictly shorter than
/// `buf`. If it is not, the payload is read and discarded so that the stream
/// remains usable, and `Error::TooLong` is returned.
pub fn read_msg<T: Read>(stream: &mut T, buf: &mut [u8]) -> Result<Option<usize>, Error> {
    let mut len_bytes = [0; size_of::<usize>()];
    match read_full(stream, &mut len_bytes)? {
        0 => return Ok(None),
        n if n != len_bytes.len() => return Err(Error::LengthRead),
        _ => (),
    }
    let len = usize::from_ne_bytes(len_bytes);

    if len >= buf.len() {
        discard(stream, len)?;
        return Err(Error::TooLong {
            len,
            capacity: buf.len(),
        });
    }

    if read_full(stream, &mut buf[..len])? != len {
        return Err(Error::MsgRead);
    }
    buf[len] = 0;

    Ok(Some(len))
}

/// Read a prompt message into `buf`.
///
/// Returns `Ok(None)` if the stream ended cleanly before the prompt started,
/// meaning that the peer has no more prompts to send. Otherwise, returns the
/// type tag and the payload length, with the payload stored in `buf` as for
/// [read_msg](fn.read_msg.html).
pub fn read_prompt<T: Read>(
    stream: &mut T,
    buf: &mut [u8],
) -> Result<Option<(c_int, usize)>, Error> {
    let mut type_bytes = [0; size_of::<c_int>()];
    match read_full(stream, &mut type_bytes)? {
        0 => return Ok(None),
        n if n != type_bytes.len() => return Err(Error::TypeRead),
        _ => (),
    }
    let msg_type = c_int::from_ne_bytes(type_bytes);

    match read_msg(stream, buf)? {
        Some(len) => Ok(Some((msg_type, len))),
        // A type tag without a message is a truncated prompt.
        None => Err(Error::LengthRead),
    }
}

/// Write a reply message. Returns the number of payload bytes written.
pub fn write_msg<T: Write>(stream: &mut T, payload: &[u8]) -> Result<usize, Error> {
    let len_bytes = payload.len().to_ne_bytes();
    if write_full(stream, &len_bytes)? != len_bytes.len() {
        return Err(Error::LengthWrite);
    }
    if write_full(stream, payload)? != payload.len() {
        return Err(Error::MsgWrite);
    }
    stream.flush()?;
    Ok(payload.len())
}

/// Write a prompt message. Returns the number of payload bytes written.
pub fn write_prompt<T: Write>(
    stream: &mut T,
    msg_type: c_int,
    payload: &[u8],
) -> Result<usize, Error> {
    let type_bytes = msg_type.to_ne_bytes();
    if write_full(stream, &type_bytes)? != type_bytes.len() {
        return Err(Error::TypeWrite);
    }
    write_msg(stream, payload)
}
