//! # `lockauth` helper protocol library
//!
//! This library implements the wire protocol spoken between a screen locker
//! and its password helper. The helper runs the PAM conversation and the
//! locker answers the questions PAM asks, so the locker itself never needs
//! any privileges.
//!
//! Two unidirectional pipes carry the traffic: the helper writes prompts to
//! its stdout, and reads replies from its stdin. The exchange is strictly
//! request/reply: the helper never sends a second prompt before the first one
//! has been answered.
//!
//! # Format
//!
//! A reply from the locker to the helper:
//!
//! ```text
//! +------------+-----------------+
//! | len: usize | payload: [u8]   |
//! +------------+-----------------+
//! ```
//!
//! A prompt from the helper to the locker:
//!
//! ```text
//! +-------------+------------+-----------------+
//! | type: c_int | len: usize | payload: [u8]   |
//! +-------------+------------+-----------------+
//! ```
//!
//! All integers are in native byte-order and width. Both ends of the pipe run
//! on the same machine, so no negotiation takes place. The payload is opaque:
//! it is not terminated on the wire and may contain any byte.
//!
//! See [codec](codec/index.html) for the reader and writer functions.

pub mod codec;
pub mod scrambler;

/// Capacity of the buffers both ends of the protocol read messages into. A
/// message must be strictly shorter than this to be accepted, as one byte is
/// reserved for the terminator added by the reader.
pub const MAX_MESSAGE: usize = 1024;

/// A prompt with this type tag carries nothing to show. The locker discards
/// it, does not reply, and keeps waiting for the next prompt.
pub const IDLE_TAG: i32 = 0;

/// The style of a prompt, mirroring the four PAM message styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptStyle {
    /// A question whose answer may be echoed, such as a username.
    Visible,
    /// A question whose answer must not be echoed, such as a password.
    Secret,
    /// An error to show to the user. The reply is ignored.
    Error,
    /// An informational message to show to the user. The reply is ignored.
    Info,
}

impl PromptStyle {
    /// The type tag used on the wire. Zero is reserved for
    /// [IDLE_TAG](constant.IDLE_TAG.html).
    pub fn tag(self) -> i32 {
        match self {
            PromptStyle::Visible => 1,
            PromptStyle::Secret => 2,
            PromptStyle::Error => 3,
            PromptStyle::Info => 4,
        }
    }

    pub fn from_tag(tag: i32) -> Option<PromptStyle> {
        match tag {
            1 => Some(PromptStyle::Visible),
            2 => Some(PromptStyle::Secret),
            3 => Some(PromptStyle::Error),
            4 => Some(PromptStyle::Info),
            _ => None,
        }
    }

    /// Whether the helper expects a meaningful answer to this prompt.
    pub fn wants_answer(self) -> bool {
        matches!(self, PromptStyle::Visible | PromptStyle::Secret)
    }
}
