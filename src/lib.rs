//! # SimpleRedis
//!
//! A minimal blocking client for the Redis serialization protocol (RESP2):
//! - Generic command encoding (any name, any arguments)
//! - Streaming reply decoding with bounded nesting
//! - Lazy, type-driven reply conversion with null propagation
//! - One connection, strict request/reply
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                              │
//! │              execute(&Command) -> Reply                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Connection                             │
//! │            (BufWriter / BufReader over TCP)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Encoder   │          │   Decoder   │
//!   │  (Command)  │          │   (Reply)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  FromReply  │
//!                           │ (coercion)  │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Error, Result};
pub use config::{Config, ConfigBuilder};
pub use client::{Client, SharedClient};
pub use protocol::{Arg, Command, FromReply, Reply, ReplyKind, ServerError};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SimpleRedis
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
