//! Per-request relay state machine.
//!
//! ```text
//! RECEIVED ──denylisted──▶ 404
//!    │ decode hop log
//!    ▼
//! PLANNED ──no hops left──▶ TERMINAL ───────────┐
//!    │ next hop                                 ▼
//!    └──────────────────▶ FORWARDING ──────▶ RESPONDED
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::config::{ConfigError, RelayConfig};
use crate::hoplog;
use crate::observability::metrics;
use crate::relay::client::HopClient;
use crate::relay::error::RelayError;
use crate::relay::payload::{ResponseFormat, ResponsePayload};
use crate::routing::{self, HopPlan, HopResolver, Planner};

/// Transport-independent view of an inbound request.
#[derive(Debug, Clone, Copy, Default)]
pub struct InboundRequest<'a> {
    /// Path suffix without the leading slash.
    pub path: &'a str,
    /// Raw value of the hop log header.
    pub log_header: Option<&'a str>,
    /// Raw value of the format override header.
    pub format: Option<&'a str>,
    /// `Host` the request was addressed to.
    pub host: Option<&'a str>,
    pub request_id: Option<&'a str>,
}

/// Payload plus the representation it should be sent in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub payload: ResponsePayload,
    pub format: ResponseFormat,
}

/// Relays requests along their hop chain.
pub struct Relay {
    config: Arc<RelayConfig>,
    resolver: Arc<dyn HopResolver>,
    client: HopClient,
}

impl Relay {
    /// Build a relay using the resolver selected by `routing.mode`.
    pub fn new(config: Arc<RelayConfig>) -> Result<Self, ConfigError> {
        let resolver = routing::from_config(&config.routing);
        Self::with_resolver(config, resolver)
    }

    pub fn with_resolver(
        config: Arc<RelayConfig>,
        resolver: Arc<dyn HopResolver>,
    ) -> Result<Self, ConfigError> {
        let client = HopClient::new(&config.http)?;
        Ok(Self {
            config,
            resolver,
            client,
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Run one request through the chain.
    ///
    /// The only error returned is [`RelayError::DenylistedPath`]; downstream
    /// failures are reported inside the payload.
    pub async fn handle(&self, req: InboundRequest<'_>) -> Result<RelayReply, RelayError> {
        // RECEIVED
        if self.is_denylisted(req.path) {
            metrics::record_request("denylisted");
            return Err(RelayError::DenylistedPath(req.path.to_string()));
        }
        let inbound = hoplog::decode(req.log_header);

        // PLANNED
        let plan = self.planner().plan(req.path, inbound, req.host);
        tracing::debug!(
            request_id = req.request_id.unwrap_or("-"),
            remaining = ?plan.remaining_hops,
            origin = plan.origin,
            "Planned hops"
        );
        let format = ResponseFormat::negotiate(req.format, plan.origin);

        let payload = match (plan.next_hop_url.clone(), plan.next_hop_index()) {
            (Some(url), Some(next_index)) => self.forward(plan, &url, next_index, req.request_id).await,
            _ => {
                // TERMINAL
                metrics::record_request("terminal");
                ResponsePayload::terminal(self.config.service.secret.clone(), plan.log)
            }
        };

        // RESPONDED
        Ok(RelayReply { payload, format })
    }

    /// FORWARDING: one outbound call, outcome folded into the payload.
    async fn forward(
        &self,
        plan: HopPlan,
        url: &str,
        next_index: usize,
        request_id: Option<&str>,
    ) -> ResponsePayload {
        let deadline = self.config.upstream.timeout_for(plan.remaining_hops.len());
        tracing::debug!(
            next_hop = plan.next_hop().unwrap_or_default(),
            url = %url,
            deadline = ?deadline,
            "Forwarding to next hop"
        );

        let start = Instant::now();
        let outcome = self.client.fetch(url, &plan.log, request_id, deadline).await;
        metrics::record_outbound(start.elapsed());

        let (payload, status) = ResponsePayload::forwarded(url, plan.log, next_index, outcome);
        tracing::debug!(url = %url, status, secret = %payload.secret, "Next hop answered");
        metrics::record_hop_status(status);
        metrics::record_request("forwarded");
        payload
    }

    fn planner(&self) -> Planner<'_> {
        Planner {
            service_name: &self.config.service.name,
            protocol: &self.config.upstream.protocol,
            resolver: self.resolver.as_ref(),
        }
    }

    fn is_denylisted(&self, path: &str) -> bool {
        self.config.http.denylist.iter().any(|p| p == path)
    }
}
