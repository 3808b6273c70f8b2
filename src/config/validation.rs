//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses (`host:port`) and value ranges (limits > 0, package caps)
//! - Reject unknown log levels and formats
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;
use crate::packages::combinator::{MAX_PER_SOURCE, MAX_RESULTS};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// `host:port`, optionally prefixed with `http://` or `https://`.
fn is_host_port(address: &str) -> bool {
    let bare = address
        .strip_prefix("http://")
        .or_else(|| address.strip_prefix("https://"))
        .unwrap_or(address);
    match bare.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}

/// Check every semantic rule and collect all failures.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    for (field, address) in [
        ("backends.flights", &config.backends.flights),
        ("backends.hotels", &config.backends.hotels),
    ] {
        if !is_host_port(address) {
            errors.push(ValidationError::new(
                field,
                format!("'{address}' must be host:port"),
            ));
        }
    }
    if config.backends.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("backends.connect_timeout_secs", "must be > 0"));
    }

    if !(1..=MAX_PER_SOURCE).contains(&config.packages.max_per_source) {
        errors.push(ValidationError::new(
            "packages.max_per_source",
            format!("must be between 1 and {MAX_PER_SOURCE}"),
        ));
    }
    if !(1..=MAX_RESULTS).contains(&config.packages.max_results) {
        errors.push(ValidationError::new(
            "packages.max_results",
            format!("must be between 1 and {MAX_RESULTS}"),
        ));
    }
    if config.packages.default_stay_nights == 0 {
        errors.push(ValidationError::new("packages.default_stay_nights", "must be > 0"));
    }

    if config.chat.buffer_size == 0 {
        errors.push(ValidationError::new("chat.buffer_size", "must be > 0"));
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", observability.log_level),
        ));
    }
    if !LOG_FORMATS.contains(&observability.log_format.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected one of {LOG_FORMATS:?}"),
        ));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn backend_addresses_need_a_port() {
        let mut config = GatewayConfig::default();
        config.backends.flights = "voos".into();
        config.backends.hotels = "http://hoteis:50052".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "backends.flights");
    }

    #[test]
    fn reports_every_failure() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "localhost".into();
        config.chat.buffer_size = 0;
        config.observability.log_format = "xml".into();
        config.observability.log_level = "loud".into();
        config.security.max_body_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn package_limits_are_capped() {
        let mut config = GatewayConfig::default();
        config.packages.max_per_source = 5;
        config.packages.max_results = 10;
        assert!(validate_config(&config).is_ok());

        config.packages.max_per_source = 6;
        config.packages.max_results = 11;
        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["packages.max_per_source", "packages.max_results"]);
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
