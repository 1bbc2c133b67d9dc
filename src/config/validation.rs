//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port > 0, capacity > 0, timeouts > 0)
//! - Check that every allowed-header pattern compiles
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::BridgeConfig;
use crate::security::headers;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("address must not be empty")]
    EmptyAddress,

    #[error("client_destination.domain must not be empty")]
    EmptyDomain,

    #[error("client_destination.domain '{0}' is not a valid host")]
    InvalidDomain(String),

    #[error("client_destination.port must be greater than 0")]
    ZeroPort,

    #[error("allowed_request_headers[{index}] '{pattern}' is not a valid pattern: {reason}")]
    InvalidHeaderPattern {
        index: usize,
        pattern: String,
        reason: String,
    },

    #[error("bus.capacity must be greater than 0")]
    ZeroBusCapacity,

    #[error("ingress.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("ingress.request_timeout_secs must be greater than 0")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.address.trim().is_empty() {
        errors.push(ValidationError::EmptyAddress);
    }
    if config.client_destination.domain.trim().is_empty() {
        errors.push(ValidationError::EmptyDomain);
    } else if config
        .client_destination
        .authority()
        .parse::<Authority>()
        .is_err()
    {
        errors.push(ValidationError::InvalidDomain(
            config.client_destination.domain.clone(),
        ));
    }
    if config.client_destination.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    for (index, pattern) in config.allowed_request_headers.iter().enumerate() {
        if let Err(e) = headers::compile(pattern) {
            errors.push(ValidationError::InvalidHeaderPattern {
                index,
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.bus.capacity == 0 {
        errors.push(ValidationError::ZeroBusCapacity);
    }

    if config.ingress.enabled {
        if config.ingress.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBindAddress(
                config.ingress.bind_address.clone(),
            ));
        }
        if config.ingress.request_timeout_secs == 0 {
            errors.push(ValidationError::ZeroRequestTimeout);
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
