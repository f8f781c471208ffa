//! # chat-proto
//!
//! The wire protocol of a small line-delimited chat service.
//!
//! ## Features
//!
//! - Typed [`Message`] values with direction-aware decoding
//! - Fallible encoding that refuses to emit ambiguous lines
//! - A newline [`LineCodec`] for `tokio_util::codec` (feature `tokio`)
//! - A headless [`ChatClient`](client::ChatClient) for front ends (feature `tokio`)

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```rust
//! use chat_proto::{Direction, Message};
//!
//! let line = Message::Private { target: "bob".into(), body: "hi: there".into() }
//!     .encode()
//!     .unwrap();
//! assert_eq!(line, "PRIVATE:bob:hi: there");
//!
//! let back = Message::decode(&line, Direction::Inbound).unwrap();
//! assert_eq!(back.tag(), "PRIVATE");
//! ```

pub mod error;
pub mod message;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
pub mod line;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::error::{MalformedCause, ProtocolError};
pub use self::message::{Direction, LIST_SEPARATOR, Message, MessageKind, SEPARATOR};

#[cfg(feature = "tokio")]
pub use self::client::{ChatClient, ClientEvent};
#[cfg(feature = "tokio")]
pub use self::line::{DEFAULT_MAX_LINE_LEN, LineCodec};
