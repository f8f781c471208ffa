//! State management module.
//!
//! Contains the per-connection [`Session`] and the shared [`SessionRegistry`]
//! that decides who is online.

mod dashmap_ext;
mod id;
mod registry;
mod session;

pub use dashmap_ext::DashMapExt;
pub use id::{SessionId, SessionIdGenerator};
pub use registry::SessionRegistry;
pub use session::Session;
