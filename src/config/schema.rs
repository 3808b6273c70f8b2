//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::packages::PackageLimits;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend service addresses.
    pub backends: BackendsConfig,

    /// Package combination limits.
    pub packages: PackagesConfig,

    /// Chat session settings.
    pub chat: ChatConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request limits and CORS.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Backend service addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendsConfig {
    /// Flight service address (`host:port`).
    pub flights: String,

    /// Hotel service address (`host:port`).
    pub hotels: String,

    /// TCP connect timeout for both channels.
    pub connect_timeout_secs: u64,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            flights: "localhost:50051".to_string(),
            hotels: "localhost:50052".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

/// Package combination limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// Offers taken from each result set before pairing.
    pub max_per_source: usize,

    /// Packages returned to the client.
    pub max_results: usize,

    /// Stay length when no return date is known.
    pub default_stay_nights: u32,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        let limits = PackageLimits::default();
        Self {
            max_per_source: limits.max_per_source,
            max_results: limits.max_results,
            default_stay_nights: limits.default_stay_nights,
        }
    }
}

impl PackagesConfig {
    pub fn limits(&self) -> PackageLimits {
        PackageLimits {
            max_per_source: self.max_per_source,
            max_results: self.max_results,
            default_stay_nights: self.default_stay_nights,
        }
    }
}

/// Chat session settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay before the greeting is queued.
    pub greeting_delay_ms: u64,

    /// Capacity of each per-session message queue.
    pub buffer_size: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting_delay_ms: 500,
            buffer_size: 64,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request limits and CORS.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Allow any origin (the browser client is served from elsewhere).
    pub cors_permissive: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024,
            cors_permissive: true,
        }
    }
}
