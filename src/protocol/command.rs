//! Command definitions
//!
//! A command is a name plus positional arguments, framed on the wire as a
//! multi-bulk of bulk strings.

use std::borrow::Cow;

use bytes::Bytes;

use crate::client::Client;
use crate::error::Result;
use super::{FromReply, Reply};

/// A single command argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// UTF-8 text
    Text(String),

    /// 32-bit integer, sent as base-10 ASCII
    Int(i32),

    /// 64-bit integer, sent as base-10 ASCII
    Int64(i64),

    /// Opaque bytes, sent unchanged
    Bytes(Bytes),
}

impl Arg {
    /// The bytes this argument occupies on the wire (without framing)
    pub fn render(&self) -> Cow<'_, [u8]> {
        match self {
            Arg::Text(text) => Cow::Borrowed(text.as_bytes()),
            Arg::Int(n) => Cow::Owned(render_int(i64::from(*n))),
            Arg::Int64(n) => Cow::Owned(render_int(*n)),
            Arg::Bytes(bytes) => Cow::Borrowed(bytes.as_ref()),
        }
    }
}

fn render_int(n: i64) -> Vec<u8> {
    if (0..10).contains(&n) {
        vec![b'0' + n as u8]
    } else {
        n.to_string().into_bytes()
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Text(value.clone())
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int64(value)
    }
}

impl From<&[u8]> for Arg {
    fn from(value: &[u8]) -> Self {
        Arg::Bytes(Bytes::copy_from_slice(value))
    }
}

impl<const N: usize> From<&[u8; N]> for Arg {
    fn from(value: &[u8; N]) -> Self {
        Arg::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for Arg {
    fn from(value: Vec<u8>) -> Self {
        Arg::Bytes(Bytes::from(value))
    }
}

impl From<Bytes> for Arg {
    fn from(value: Bytes) -> Self {
        Arg::Bytes(value)
    }
}

/// A command ready to be sent
///
/// ```
/// use simpleredis::Command;
///
/// let cmd = Command::new("SET").arg("greeting").arg("hello");
/// assert_eq!(cmd.name(), "SET");
/// assert_eq!(cmd.arguments().len(), 2);
/// assert_eq!(cmd.frame_len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<Arg>,
}

impl Command {
    /// Start a command with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Build a command from a name and an already collected argument list
    pub fn with_args(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments of the same type
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Arg] {
        &self.args
    }

    /// Number of framed elements on the wire (name included)
    pub fn frame_len(&self) -> usize {
        self.args.len() + 1
    }

    /// Send this command on `client` and return the raw reply
    pub fn execute(&self, client: &mut Client) -> Result<Reply> {
        client.execute(self)
    }

    /// Send this command on `client` and convert the reply
    pub fn query<T: FromReply>(&self, client: &mut Client) -> Result<T> {
        client.query(self)
    }
}
