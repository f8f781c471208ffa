//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    let limits = &config.limits;
    let checks = [
        ("max_line_len", limits.max_line_len == 0),
        ("max_username_len", limits.max_username_len == 0),
        ("outbound_queue", limits.outbound_queue == 0),
        ("send_timeout_ms", limits.send_timeout_ms == 0),
    ];
    for (name, is_zero) in checks {
        if is_zero {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
