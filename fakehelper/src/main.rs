//! A stand-in for `lockauth-helper` that speaks the helper side of the
//! protocol without involving PAM. The service name selects a scripted
//! conversation, which makes it useful for testing lockers and the relay.

use std::{
    env,
    fs::File,
    io::{self, Write},
    os::unix::io::AsFd,
    process,
};

use lockauth_ipc::{codec, PromptStyle, IDLE_TAG, MAX_MESSAGE};
use nix::unistd::close;

const PASSWORD: &str = "hunter2";

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

struct Conversation {
    input: File,
    output: File,
}

impl Conversation {
    fn new() -> Result<Conversation> {
        Ok(Conversation {
            input: File::from(io::stdin().as_fd().try_clone_to_owned()?),
            output: File::from(io::stdout().as_fd().try_clone_to_owned()?),
        })
    }

    fn question(&mut self, style: PromptStyle, msg: &[u8]) -> Result<Vec<u8>> {
        codec::write_prompt(&mut self.output, style.tag(), msg)?;
        let mut buf = [0; MAX_MESSAGE];
        match codec::read_msg(&mut self.input, &mut buf)? {
            Some(len) => Ok(buf[..len].to_vec()),
            None => Err("caller closed the reply stream".into()),
        }
    }

    /// Wait for the caller to close the reply stream.
    fn hang_up(&mut self) -> Result<()> {
        io::copy(&mut self.input, &mut io::sink())?;
        Ok(())
    }
}

/// Run the named script. Returns whether the "user" authenticated.
fn run(script: &str, user: Option<&str>) -> Result<bool> {
    let mut conv = Conversation::new()?;
    match script {
        // One password prompt.
        "password" => Ok(conv.question(PromptStyle::Secret, b"Password: ")? == PASSWORD.as_bytes()),

        // Every prompt style, in the order a chatty PAM stack might use them.
        "multi" => {
            let login = conv.question(PromptStyle::Visible, b"login: ")?;
            let password = conv.question(PromptStyle::Secret, b"Password: ")?;
            conv.question(PromptStyle::Info, b"Welcome")?;
            conv.question(PromptStyle::Error, b"Account expires soon")?;
            Ok(Some(login.as_slice()) == user.map(str::as_bytes) && password == PASSWORD.as_bytes())
        }

        // Send the answer back as an informational prompt.
        "echo" => {
            let answer = conv.question(PromptStyle::Secret, b"Password: ")?;
            conv.question(PromptStyle::Info, &answer)?;
            Ok(true)
        }

        // Idle frames ahead of an ordinary password prompt.
        "idle" => {
            codec::write_prompt(&mut conv.output, IDLE_TAG, b"")?;
            codec::write_prompt(&mut conv.output, IDLE_TAG, b"ignored")?;
            Ok(conv.question(PromptStyle::Secret, b"Password: ")? == PASSWORD.as_bytes())
        }

        "fail" => Ok(false),

        "silent" => Ok(true),

        "crash" => {
            conv.question(PromptStyle::Secret, b"Password: ")?;
            process::abort();
        }

        // Half a type tag, then a clean exit once the caller hangs up.
        "garbage" => {
            conv.output.write_all(&PromptStyle::Secret.tag().to_ne_bytes()[..2])?;
            drop(conv.output);
            close(nix::libc::STDOUT_FILENO)?;
            io::copy(&mut conv.input, &mut io::sink())?;
            Ok(true)
        }

        "toolong" => {
            conv.question(PromptStyle::Info, &[b'x'; MAX_MESSAGE])?;
            Ok(true)
        }

        "badstyle" => {
            codec::write_prompt(&mut conv.output, 9, b"???")?;
            conv.hang_up()?;
            Ok(true)
        }

        _ => Err(format!("unknown script: {}", script).into()),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("usage: {} <script> [user]", args[0]);
        process::exit(2);
    }

    match run(&args[1], args.get(2).map(String::as_str)) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("fakehelper: {}", e);
            process::exit(2);
        }
    }
}
