//! Hop resolution strategies.
//!
//! # Responsibilities
//! - Turn a hop identifier into the host part of the next-hop URL
//! - Keep debug-only routing out of the production code path
//!
//! # Design Decisions
//! - Strategy is chosen once at startup from `routing.mode`
//! - Resolvers are pure: same identifier and context, same host

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ResolverMode, RoutingConfig};

/// Facts about the inbound request a resolver may consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveContext<'a> {
    /// `Host` of the inbound request, if known.
    pub request_host: Option<&'a str>,
    /// Inbound path suffix without the leading slash.
    pub request_path: &'a str,
}

/// Maps hop identifiers to hosts.
pub trait HopResolver: Send + Sync + std::fmt::Debug {
    /// Host (optionally `host:port` or `host/prefix`) for the given hop.
    fn resolve_host(&self, hop: &str, ctx: &ResolveContext<'_>) -> String;
}

/// Uses the hop identifier as the host name.
#[derive(Debug, Clone, Default)]
pub struct DirectResolver;

impl HopResolver for DirectResolver {
    fn resolve_host(&self, hop: &str, _ctx: &ResolveContext<'_>) -> String {
        hop.to_string()
    }
}

/// Sends every hop back to the inbound request's own host, so one
/// instance can play every service in a chain.
#[derive(Debug, Clone)]
pub struct LocalResolver {
    reserved_path: String,
    reserved_target: String,
}

impl LocalResolver {
    pub fn new(reserved_path: impl Into<String>, reserved_target: impl Into<String>) -> Self {
        Self {
            reserved_path: reserved_path.into(),
            reserved_target: reserved_target.into(),
        }
    }
}

impl HopResolver for LocalResolver {
    fn resolve_host(&self, hop: &str, ctx: &ResolveContext<'_>) -> String {
        if ctx.request_path == self.reserved_path {
            return self.reserved_target.clone();
        }
        match ctx.request_host {
            Some(host) => host.to_string(),
            None => hop.to_string(),
        }
    }
}

/// Looks hops up in a fixed table and falls back to the identifier.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    hosts: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new(hosts: HashMap<String, String>) -> Self {
        Self { hosts }
    }
}

impl HopResolver for StaticResolver {
    fn resolve_host(&self, hop: &str, _ctx: &ResolveContext<'_>) -> String {
        self.hosts
            .get(hop)
            .cloned()
            .unwrap_or_else(|| hop.to_string())
    }
}

/// Build the resolver selected by configuration.
pub fn from_config(config: &RoutingConfig) -> Arc<dyn HopResolver> {
    match config.mode {
        ResolverMode::Direct => Arc::new(DirectResolver),
        ResolverMode::Local => Arc::new(LocalResolver::new(
            config.reserved_path.clone(),
            config.reserved_target.clone(),
        )),
        ResolverMode::Static => Arc::new(StaticResolver::new(config.hosts.clone())),
    }
}
