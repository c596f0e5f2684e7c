//! Protocol codec
//!
//! Encoding of commands and decoding of replies.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! *<arg count + 1>\r\n
//! $<len(name)>\r\n<name>\r\n
//! $<len(arg)>\r\n<arg>\r\n      (once per argument)
//! ```
//!
//! ### Reply Format
//! ```text
//! +<status>\r\n
//! -<error message>\r\n
//! :<decimal integer>\r\n
//! $<len>\r\n<bytes>\r\n  |  $-1\r\n
//! *<count>\r\n<reply>...  |  *-1\r\n
//! ```

use std::io::{self, BufRead, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use super::{Arg, Command, Reply, ReplyKind};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Length value marking an absent bulk or multi-bulk
pub const ABSENT_LEN: i64 = -1;

/// Upper bound on elements reserved up front for a multi-bulk
const MAX_PREALLOC_ITEMS: usize = 1024;

/// Upper bound on bytes reserved up front for a bulk payload
const MAX_PREALLOC_BYTES: usize = 64 * 1024;

/// Longest length line accepted (an i64 needs at most 20 characters)
const MAX_LENGTH_LINE: usize = 64;

/// Limits applied while decoding a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Deepest multi-bulk nesting accepted (the outermost reply is depth 1)
    pub max_depth: usize,

    /// Largest bulk payload accepted (in bytes)
    pub max_bulk_len: usize,
}

impl DecodeLimits {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Matches the server's default `proto-max-bulk-len` (512 MB)
    pub const DEFAULT_MAX_BULK_LEN: usize = 512 * 1024 * 1024;
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_bulk_len: Self::DEFAULT_MAX_BULK_LEN,
        }
    }
}

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
pub fn encode_command(command: &Command) -> Bytes {
    let mut buf = BytesMut::with_capacity(encoded_len_hint(command));
    encode_command_into(command, &mut buf);
    buf.freeze()
}

/// Append the framed command to `buf`
pub fn encode_command_into(command: &Command, buf: &mut BytesMut) {
    put_header(buf, b'*', command.frame_len());
    put_bulk(buf, command.name().as_bytes());
    for arg in command.arguments() {
        put_bulk(buf, &arg.render());
    }
}

/// Write a command to a stream
///
/// The command is framed in memory first, written in one piece and flushed
/// once, so nothing is left buffered when this returns.
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

fn put_bulk(buf: &mut BytesMut, data: &[u8]) {
    put_header(buf, b'$', data.len());
    buf.put_slice(data);
    buf.put_slice(CRLF);
}

fn put_header(buf: &mut BytesMut, tag: u8, len: usize) {
    buf.put_u8(tag);
    if len < 10 {
        buf.put_u8(b'0' + len as u8);
    } else {
        buf.put_slice(len.to_string().as_bytes());
    }
    buf.put_slice(CRLF);
}

fn encoded_len_hint(command: &Command) -> usize {
    // room for a short header per element plus the payloads themselves
    const PER_ELEMENT: usize = 16;
    let payload: usize = command
        .arguments()
        .iter()
        .map(|arg| match arg {
            Arg::Text(text) => text.len(),
            Arg::Bytes(bytes) => bytes.len(),
            Arg::Int(_) | Arg::Int64(_) => 20,
        })
        .sum();
    PER_ELEMENT * (command.frame_len() + 1) + command.name().len() + payload
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Read a complete reply from a stream
///
/// Blocks until a complete reply is received or an error occurs.
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    read_reply_with(reader, &DecodeLimits::default())
}

/// Read a complete reply from a stream, enforcing `limits`
pub fn read_reply_with<R: BufRead>(reader: &mut R, limits: &DecodeLimits) -> Result<Reply> {
    read_nested(reader, limits, 1)
}

fn read_nested<R: BufRead>(reader: &mut R, limits: &DecodeLimits, depth: usize) -> Result<Reply> {
    if depth > limits.max_depth {
        return Err(Error::Protocol(format!(
            "Reply nested deeper than {} levels",
            limits.max_depth
        )));
    }

    let tag = read_byte(reader)?;
    let kind = ReplyKind::from_tag(tag).ok_or_else(|| {
        Error::Protocol(format!("Unexpected reply type: {:?}", tag as char))
    })?;

    match kind {
        ReplyKind::Status => Ok(Reply::Status(read_line(reader, limits.max_bulk_len)?)),
        ReplyKind::Error => Ok(Reply::Error(read_line(reader, limits.max_bulk_len)?)),
        ReplyKind::Integer => Ok(Reply::Integer(read_line(reader, limits.max_bulk_len)?)),
        ReplyKind::Bulk => read_bulk(reader, limits),
        ReplyKind::MultiBulk => read_multi_bulk(reader, limits, depth),
    }
}

/// Decode the body of a `$` reply
fn read_bulk<R: BufRead>(reader: &mut R, limits: &DecodeLimits) -> Result<Reply> {
    let len = match read_length(reader)? {
        None => return Ok(Reply::Bulk(None)),
        Some(len) => len,
    };

    if len > limits.max_bulk_len {
        return Err(Error::Protocol(format!(
            "Bulk reply too large: {} bytes (max {})",
            len, limits.max_bulk_len
        )));
    }

    // Grow with the bytes that actually arrive rather than trusting the header
    let mut data = Vec::with_capacity(len.min(MAX_PREALLOC_BYTES));
    reader
        .by_ref()
        .take(len as u64)
        .read_to_end(&mut data)
        .map_err(eof_as_closed)?;
    if data.len() < len {
        return Err(Error::ConnectionClosed);
    }
    read_end_of_line(reader)?;

    Ok(Reply::Bulk(Some(Bytes::from(data))))
}

/// Decode the body of a `*` reply, recursing into each element
fn read_multi_bulk<R: BufRead>(
    reader: &mut R,
    limits: &DecodeLimits,
    depth: usize,
) -> Result<Reply> {
    let len = match read_length(reader)? {
        None => return Ok(Reply::MultiBulk(None)),
        Some(len) => len,
    };

    let mut items = Vec::with_capacity(len.min(MAX_PREALLOC_ITEMS));
    for _ in 0..len {
        items.push(read_nested(reader, limits, depth + 1)?);
    }

    Ok(Reply::MultiBulk(Some(items)))
}

/// Read a length line; `None` is the absent marker
fn read_length<R: BufRead>(reader: &mut R) -> Result<Option<usize>> {
    let line = read_line(reader, MAX_LENGTH_LINE)?;
    let len = parse_length(&line)?;

    if len == ABSENT_LEN {
        return Ok(None);
    }
    usize::try_from(len)
        .map(Some)
        .map_err(|_| Error::Protocol(format!("Invalid length: {}", len)))
}

/// Parse a decimal length, with a shortcut for single digits
pub fn parse_length(line: &[u8]) -> Result<i64> {
    if let [byte] = line {
        let digit = byte.wrapping_sub(b'0');
        if digit > 9 {
            return Err(Error::Protocol(format!(
                "Invalid length: {:?}",
                *byte as char
            )));
        }
        return Ok(i64::from(digit));
    }

    std::str::from_utf8(line)
        .ok()
        .and_then(|text| text.parse::<i64>().ok())
        .ok_or_else(|| {
            Error::Protocol(format!(
                "Invalid length: {:?}",
                String::from_utf8_lossy(line)
            ))
        })
}

/// Read bytes up to CRLF, returning them without the terminator
///
/// The first CR must be followed by LF, and must arrive within `max_len`
/// bytes.
fn read_line<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Bytes> {
    let mut line = Vec::new();
    // one extra byte for the CR itself
    let limit = max_len.saturating_add(1) as u64;
    reader.by_ref().take(limit).read_until(b'\r', &mut line)?;

    if line.last() != Some(&b'\r') {
        if line.len() as u64 >= limit {
            return Err(Error::Protocol(format!(
                "Line longer than {} bytes",
                max_len
            )));
        }
        return Err(Error::ConnectionClosed);
    }
    line.pop();
    if read_byte(reader)? != b'\n' {
        return Err(Error::Protocol("Expected end-of-line".to_string()));
    }

    Ok(Bytes::from(line))
}

fn read_end_of_line<R: BufRead>(reader: &mut R) -> Result<()> {
    if read_byte(reader)? != b'\r' || read_byte(reader)? != b'\n' {
        return Err(Error::Protocol("Expected end-of-line".to_string()));
    }
    Ok(())
}

fn read_byte<R: BufRead>(reader: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte).map_err(eof_as_closed)?;
    Ok(byte[0])
}

/// A short read means the peer went away mid-reply
fn eof_as_closed(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::ConnectionClosed
    } else {
        Error::Io(err)
    }
}
