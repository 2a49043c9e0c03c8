//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, known schemes)
//! - Check that header names are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::{RelayConfig, ResolverMode};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service.name must not be empty")]
    EmptyServiceName,

    #[error("upstream.protocol {0:?} is not supported (only http)")]
    UnsupportedProtocol(String),

    #[error("upstream.timeout_base_ms must be greater than zero")]
    ZeroTimeout,

    #[error("http.{field} {value:?} is not a valid header name")]
    InvalidHeader { field: &'static str, value: String },

    #[error("routing.hosts must not be empty in static mode")]
    EmptyHostTable,

    #[error("routing.reserved_target must not be empty in local mode")]
    EmptyReservedTarget,
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }

    // The outbound connector speaks plain HTTP only.
    let protocol = config.upstream.protocol.as_str();
    if protocol != "http" {
        errors.push(ValidationError::UnsupportedProtocol(protocol.to_string()));
    }

    if config.upstream.timeout_base_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for (field, value) in [
        ("log_header", &config.http.log_header),
        ("format_header", &config.http.format_header),
    ] {
        if HeaderName::from_bytes(value.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeader {
                field,
                value: value.clone(),
            });
        }
    }

    match config.routing.mode {
        ResolverMode::Static if config.routing.hosts.is_empty() => {
            errors.push(ValidationError::EmptyHostTable);
        }
        ResolverMode::Local if config.routing.reserved_target.trim().is_empty() => {
            errors.push(ValidationError::EmptyReservedTarget);
        }
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
