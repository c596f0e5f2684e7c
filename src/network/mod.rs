//! Network Module
//!
//! TCP transport to the server.
//!
//! ## Model
//! - One socket per client, split into buffered read/write halves
//! - Strict request/reply: a command is flushed before its reply is read
//! - Blocking I/O with optional socket timeouts

mod connection;

pub use connection::Connection;
