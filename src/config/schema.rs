//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a relay
//! instance. All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a relay instance.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Identity of this instance (name and secret).
    pub service: ServiceConfig,

    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Outbound call settings.
    pub upstream: UpstreamConfig,

    /// How hop identifiers are turned into hosts.
    pub routing: RoutingConfig,

    /// Inbound HTTP surface settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Comic endpoint settings.
    pub comic: ComicConfig,
}

/// Identity of the service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Name used for this instance's own hop record on origin calls.
    pub name: String,

    /// Secret returned when this instance terminates a chain.
    pub secret: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            secret: "default_secret".to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind.
    pub port: u16,
}

impl ListenerConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Outbound call configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme used for next-hop URLs.
    pub protocol: String,

    /// Fixed part of the outbound deadline in milliseconds.
    pub timeout_base_ms: u64,

    /// Additional deadline per remaining hop in milliseconds.
    pub timeout_per_hop_ms: u64,
}

impl UpstreamConfig {
    /// Deadline for an outbound call with `remaining` hops still to visit.
    pub fn timeout_for(&self, remaining: usize) -> Duration {
        let per_hop = self.timeout_per_hop_ms.saturating_mul(remaining as u64);
        Duration::from_millis(self.timeout_base_ms.saturating_add(per_hop))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            timeout_base_ms: 1000,
            timeout_per_hop_ms: 1000,
        }
    }
}

/// Hop resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolverMode {
    /// The hop identifier is the host.
    #[default]
    Direct,
    /// Every hop goes back to the inbound request's own host.
    Local,
    /// Hops are looked up in `routing.hosts`, falling back to direct.
    Static,
}

/// Routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Resolution strategy selected at startup.
    pub mode: ResolverMode,

    /// Path that the local resolver sends to `reserved_target`.
    pub reserved_path: String,

    /// Host (optionally with a path prefix) used for `reserved_path`.
    pub reserved_target: String,

    /// Hop identifier to host[:port] table for the static resolver.
    pub hosts: HashMap<String, String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            mode: ResolverMode::Direct,
            reserved_path: "dead".to_string(),
            reserved_target: "34.95.119.80/bar-api.bar".to_string(),
            hosts: HashMap::new(),
        }
    }
}

/// Inbound HTTP surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Header carrying the encoded hop log.
    pub log_header: String,

    /// Header carrying the response format override.
    pub format_header: String,

    /// Paths answered with 404 before any hop processing.
    pub denylist: Vec<String>,

    /// Inbound timeout in seconds for `/xkcd`. Relay routes are bounded by
    /// the outbound deadline instead.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            log_header: "X-Svc-Log".to_string(),
            format_header: "X-Chain-Fmt".to_string(),
            denylist: vec!["favicon.ico".to_string()],
            request_timeout_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Comic endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ComicConfig {
    /// Serve `/xkcd`; when off, `xkcd` is an ordinary hop identifier.
    pub enabled: bool,

    /// Comic metadata endpoint.
    pub url: String,
}

impl Default for ComicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://xkcd.com/info.0.json".to_string(),
        }
    }
}
