use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::io::{Read, Write};

use lockauth_ipc::{codec, scrambler::Scrambler, PromptStyle, MAX_MESSAGE};
use log::error;

use crate::pam::Converse;

/// RelayConv is a PAM conversation implementation that forwards questions to
/// the caller over one stream, and reads the answers back from another.
pub struct RelayConv<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: Read, W: Write> RelayConv<R, W> {
    pub fn new(input: R, output: W) -> RelayConv<R, W> {
        RelayConv {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    fn question(&self, style: PromptStyle, msg: &CStr) -> Result<CString, ()> {
        codec::write_prompt(&mut *self.output.borrow_mut(), style.tag(), msg.to_bytes())
            .map_err(|e| error!("error writing prompt: {} ({})", e, e.code()))?;

        let mut buf = [0; MAX_MESSAGE];
        let res = match codec::read_msg(&mut *self.input.borrow_mut(), &mut buf) {
            // PAM reads the reply as a C string, so it ends at the first NUL
            // whether or not one was sent.
            Ok(Some(len)) => CStr::from_bytes_until_nul(&buf[..=len])
                .map(|s| s.to_owned())
                .map_err(|_| error!("reply was not terminated")),
            Ok(None) => Err(error!("caller closed the reply stream")),
            Err(e) => Err(error!("error reading reply: {} ({})", e, e.code())),
        };
        buf.scramble();
        res
    }

    /// Consumes the conversation, returning the streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input.into_inner(), self.output.into_inner())
    }
}

impl<R: Read, W: Write> Converse for RelayConv<R, W> {
    fn prompt_echo(&self, msg: &CStr) -> Result<CString, ()> {
        self.question(PromptStyle::Visible, msg)
    }
    fn prompt_blind(&self, msg: &CStr) -> Result<CString, ()> {
        self.question(PromptStyle::Secret, msg)
    }
    fn info(&self, msg: &CStr) -> Result<(), ()> {
        self.question(PromptStyle::Info, msg)
            .map(|s| s.into_bytes().scramble())
    }
    fn error(&self, msg: &CStr) -> Result<(), ()> {
        self.question(PromptStyle::Error, msg)
            .map(|s| s.into_bytes().scramble())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn replies(answers: &[&[u8]]) -> Cursor<Vec<u8>> {
        let mut out = Vec::new();
        for answer in answers {
            codec::write_msg(&mut out, answer).expect("write to vec failed");
        }
        Cursor::new(out)
    }

    fn cstr(s: &str) -> CString {
        CString::new(s).expect("nul in test string")
    }

    #[test]
    fn relays_in_order() {
        let answers: [&[u8]; 4] = [b"alice", b"hunter2", b"", b""];
        let conv = RelayConv::new(replies(&answers), Vec::new());

        assert_eq!(
            conv.prompt_echo(&cstr("login:")).expect("echo failed"),
            cstr("alice")
        );
        assert_eq!(
            conv.prompt_blind(&cstr("Password:")).expect("blind failed"),
            cstr("hunter2")
        );
        conv.info(&cstr("Last login: never")).expect("info failed");
        conv.error(&cstr("Account expires soon")).expect("error failed");

        let (_, sent) = conv.into_inner();
        let mut sent = Cursor::new(sent);
        let mut buf = [0; MAX_MESSAGE];
        let expected = [
            (PromptStyle::Visible, "login:"),
            (PromptStyle::Secret, "Password:"),
            (PromptStyle::Info, "Last login: never"),
            (PromptStyle::Error, "Account expires soon"),
        ];
        for (style, text) in expected.iter() {
            let (tag, len) = codec::read_prompt(&mut sent, &mut buf)
                .expect("read failed")
                .expect("unexpected eof");
            assert_eq!(tag, style.tag());
            assert_eq!(&buf[..len], text.as_bytes());
        }
        assert!(matches!(codec::read_prompt(&mut sent, &mut buf), Ok(None)));
    }

    #[test]
    fn reply_ends_at_nul() {
        let conv = RelayConv::new(replies(&[&b"abc\0def"[..]]), Vec::new());
        assert_eq!(
            conv.prompt_blind(&cstr("Password:")).expect("blind failed"),
            cstr("abc")
        );
    }

    #[test]
    fn high_bytes_survive() {
        let answer: Vec<u8> = (1..=255).collect();
        let conv = RelayConv::new(replies(&[answer.as_slice()]), Vec::new());
        let got = conv.prompt_blind(&cstr("Password:")).expect("blind failed");
        assert_eq!(got.as_bytes(), &answer[..]);
    }

    #[test]
    fn closed_reply_stream_fails() {
        let conv = RelayConv::new(replies(&[]), Vec::new());
        assert!(conv.prompt_blind(&cstr("Password:")).is_err());
    }

    #[test]
    fn oversized_reply_fails() {
        let conv = RelayConv::new(replies(&[&[b'x'; MAX_MESSAGE][..]]), Vec::new());
        assert!(conv.prompt_blind(&cstr("Password:")).is_err());
    }
}
