//! Core handler infrastructure.
//!
//! This module contains the handler trait, the per-message context, and the
//! router that owns the handler table.

pub mod context;
pub mod router;

pub use context::{Context, Handler};
pub use router::Router;
