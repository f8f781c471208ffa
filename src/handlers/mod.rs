//! Chat message handlers.
//!
//! This module contains the [`Handler`] trait and the [`Router`] that
//! dispatches decoded client messages to the handler for their type.
//!
//! Handlers receive a [`Context`] borrowing the sender's session, the shared
//! registry and the configured limits. Business-rule failures are returned as
//! [`HandlerError`](crate::error::HandlerError) values; the connection turns
//! them into `ERROR` replies.

mod connection;
mod core;
mod helpers;
mod messaging;

pub use self::connection::{LoginHandler, LogoutHandler};
pub use self::core::{Context, Handler, Router};
pub use self::messaging::{BroadcastHandler, PrivateHandler};
