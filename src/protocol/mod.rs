//! Protocol Module
//!
//! Defines the RESP2 wire protocol spoken with the server.
//!
//! ## Request Format
//! Every command is a multi-bulk of bulk strings, the command name first:
//! ```text
//! *3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n
//! ```
//!
//! ## Reply Types
//! - `+` Status:     `+OK\r\n`
//! - `-` Error:      `-ERR unknown command\r\n`
//! - `:` Integer:    `:42\r\n`
//! - `$` Bulk:       `$5\r\nvalue\r\n`, absent as `$-1\r\n`
//! - `*` Multi-bulk: `*2\r\n:1\r\n:2\r\n`, absent as `*-1\r\n`

mod command;
mod reply;
mod codec;

pub use command::{Arg, Command};
pub use reply::{FromReply, Reply, ReplyKind, ServerError};
pub use codec::{
    encode_command, encode_command_into, write_command,
    read_reply, read_reply_with, parse_length,
    DecodeLimits, ABSENT_LEN, CRLF,
};
