//! Reply definitions
//!
//! A decoded reply keeps its raw payload. Conversion into the caller's type
//! happens on demand through [`FromReply`], every time it is asked for.

use std::fmt;

use bytes::Bytes;

use crate::error::{Error, Result};

/// Wire type of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    Status,
    Error,
    Integer,
    Bulk,
    MultiBulk,
}

impl ReplyKind {
    /// The tag byte that introduces this kind on the wire
    pub fn tag(self) -> u8 {
        match self {
            ReplyKind::Status => b'+',
            ReplyKind::Error => b'-',
            ReplyKind::Integer => b':',
            ReplyKind::Bulk => b'$',
            ReplyKind::MultiBulk => b'*',
        }
    }

    /// Map a tag byte back to its kind
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'+' => Some(ReplyKind::Status),
            b'-' => Some(ReplyKind::Error),
            b':' => Some(ReplyKind::Integer),
            b'$' => Some(ReplyKind::Bulk),
            b'*' => Some(ReplyKind::MultiBulk),
            _ => None,
        }
    }
}

impl fmt::Display for ReplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyKind::Status => "status",
            ReplyKind::Error => "error",
            ReplyKind::Integer => "integer",
            ReplyKind::Bulk => "bulk",
            ReplyKind::MultiBulk => "multi-bulk",
        };
        f.write_str(name)
    }
}

/// One decoded reply
///
/// `None` in `Bulk` and `MultiBulk` is the absent marker (length -1), which
/// is distinct from a present but empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+OK\r\n`
    Status(Bytes),

    /// `-ERR message\r\n`
    Error(Bytes),

    /// `:1000\r\n`, kept as its decimal text
    Integer(Bytes),

    /// `$6\r\nfoobar\r\n` or `$-1\r\n`
    Bulk(Option<Bytes>),

    /// `*2\r\n...` or `*-1\r\n`
    MultiBulk(Option<Vec<Reply>>),
}

impl Reply {
    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::Status(_) => ReplyKind::Status,
            Reply::Error(_) => ReplyKind::Error,
            Reply::Integer(_) => ReplyKind::Integer,
            Reply::Bulk(_) => ReplyKind::Bulk,
            Reply::MultiBulk(_) => ReplyKind::MultiBulk,
        }
    }

    /// True for `$-1` and `*-1`
    pub fn is_absent(&self) -> bool {
        matches!(self, Reply::Bulk(None) | Reply::MultiBulk(None))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// The server's message if this is an error reply
    pub fn server_error(&self) -> Option<ServerError> {
        match self {
            Reply::Error(payload) => Some(ServerError::from_payload(payload)),
            _ => None,
        }
    }

    /// Convert into the requested type
    ///
    /// Error replies fail with [`Error::Server`] for every target except
    /// [`ServerError`].
    pub fn convert<T: FromReply>(&self) -> Result<T> {
        T::from_reply(self)
    }

    /// Fail with [`Error::Server`] if this is an error reply
    pub fn into_result(self) -> Result<Reply> {
        match self.server_error() {
            Some(err) => Err(err.into()),
            None => Ok(self),
        }
    }

    /// Raw payload of a scalar reply, `None` if absent
    ///
    /// Errors are reported as [`Error::Server`]; multi-bulk replies have no
    /// scalar payload.
    fn payload(&self) -> Result<Option<&Bytes>> {
        match self {
            Reply::Error(payload) => Err(ServerError::from_payload(payload).into()),
            Reply::Status(payload) | Reply::Integer(payload) => Ok(Some(payload)),
            Reply::Bulk(payload) => Ok(payload.as_ref()),
            Reply::MultiBulk(_) => Err(Error::Conversion(format!(
                "cannot convert {} reply to a scalar value",
                self.kind()
            ))),
        }
    }

    /// Raw payload of a scalar reply that must be present
    fn required_payload(&self, target: &str) -> Result<&Bytes> {
        self.payload()?.ok_or_else(|| {
            Error::Conversion(format!("cannot convert absent {} reply to {}", self.kind(), target))
        })
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(payload) | Reply::Error(payload) | Reply::Integer(payload) => {
                f.write_str(&String::from_utf8_lossy(payload))
            }
            Reply::Bulk(Some(payload)) => f.write_str(&String::from_utf8_lossy(payload)),
            Reply::Bulk(None) | Reply::MultiBulk(None) => f.write_str("(nil)"),
            Reply::MultiBulk(Some(items)) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// The text of an error reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    message: String,
}

impl ServerError {
    fn from_payload(payload: &Bytes) -> Self {
        let message = match std::str::from_utf8(payload) {
            Ok(text) => text.to_string(),
            Err(_) => "unknown error".to_string(),
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Leading word of the message, e.g. `ERR` or `WRONGTYPE`
    pub fn code(&self) -> &str {
        self.message.split_whitespace().next().unwrap_or("")
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ServerError {}

impl From<ServerError> for Error {
    fn from(err: ServerError) -> Self {
        Error::Server(err.message)
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Types a [`Reply`] can be converted into
pub trait FromReply: Sized {
    fn from_reply(reply: &Reply) -> Result<Self>;

    /// Lets `Vec<u8>` take a scalar payload whole instead of as elements.
    #[doc(hidden)]
    fn from_payload_bytes(_payload: &Bytes) -> Option<Vec<Self>> {
        None
    }
}

impl FromReply for Reply {
    fn from_reply(reply: &Reply) -> Result<Self> {
        Ok(reply.clone())
    }
}

impl FromReply for ServerError {
    fn from_reply(reply: &Reply) -> Result<Self> {
        reply.server_error().ok_or_else(|| {
            Error::Conversion(format!("{} reply is not an error", reply.kind()))
        })
    }
}

impl FromReply for () {
    fn from_reply(reply: &Reply) -> Result<Self> {
        match reply.server_error() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

impl FromReply for Bytes {
    fn from_reply(reply: &Reply) -> Result<Self> {
        reply.required_payload("bytes").cloned()
    }
}

impl FromReply for String {
    fn from_reply(reply: &Reply) -> Result<Self> {
        let payload = reply.required_payload("string")?;
        String::from_utf8(payload.to_vec())
            .map_err(|e| Error::Conversion(format!("reply is not valid UTF-8: {}", e)))
    }
}

impl FromReply for i64 {
    fn from_reply(reply: &Reply) -> Result<Self> {
        parse_integer(reply.required_payload("integer")?)
    }
}

impl FromReply for i32 {
    fn from_reply(reply: &Reply) -> Result<Self> {
        parse_integer(reply.required_payload("integer")?)
    }
}

impl FromReply for u8 {
    fn from_reply(reply: &Reply) -> Result<Self> {
        parse_integer(reply.required_payload("integer")?)
    }

    fn from_payload_bytes(payload: &Bytes) -> Option<Vec<Self>> {
        Some(payload.to_vec())
    }
}

impl FromReply for bool {
    fn from_reply(reply: &Reply) -> Result<Self> {
        let payload = reply.required_payload("boolean")?;
        if let Reply::Status(_) = reply {
            return Ok(payload.eq_ignore_ascii_case(b"OK"));
        }
        match &payload[..] {
            b"1" => Ok(true),
            b"0" => Ok(false),
            other => Err(Error::Conversion(format!(
                "cannot convert {:?} to boolean",
                String::from_utf8_lossy(other)
            ))),
        }
    }
}

impl<T: FromReply> FromReply for Option<T> {
    fn from_reply(reply: &Reply) -> Result<Self> {
        match reply {
            Reply::Bulk(None) | Reply::MultiBulk(None) => Ok(None),
            _ => T::from_reply(reply).map(Some),
        }
    }
}

impl<T: FromReply> FromReply for Vec<T> {
    fn from_reply(reply: &Reply) -> Result<Self> {
        match reply {
            Reply::MultiBulk(Some(items)) => items.iter().map(T::from_reply).collect(),
            Reply::MultiBulk(None) => Err(Error::Conversion(
                "cannot convert absent multi-bulk reply to a list".to_string(),
            )),
            _ => {
                let payload = reply.required_payload("list")?;
                T::from_payload_bytes(payload).ok_or_else(|| {
                    Error::Conversion(format!("cannot convert {} reply to a list", reply.kind()))
                })
            }
        }
    }
}

/// Parse a base-10 signed integer from a reply payload
fn parse_integer<T: std::str::FromStr>(payload: &[u8]) -> Result<T> {
    std::str::from_utf8(payload)
        .ok()
        .and_then(|text| text.parse::<T>().ok())
        .ok_or_else(|| {
            Error::Conversion(format!(
                "{:?} is not a valid integer",
                String::from_utf8_lossy(payload)
            ))
        })
}
