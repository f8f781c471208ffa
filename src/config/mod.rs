//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, ListenConfig)
//! - [`limits`]: Per-connection resource limits (LimitsConfig)
//! - [`validation`]: Startup checks run by [`Config::load`]

mod limits;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use types::Config;
