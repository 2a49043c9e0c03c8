//! Hop planning.
//!
//! # Responsibilities
//! - Split the inbound path into the remaining hops
//! - Make sure this service is represented in the outgoing log
//! - Announce the next hop as a pending record and build its URL
//!
//! # Design Decisions
//! - Pure function of its inputs; no I/O
//! - Empty path segments are skipped
//! - This service's record is marked 200 as soon as it is planned: a
//!   relay always answers its caller, failures travel as data

use crate::hoplog::{HopLog, HopRecord, STATUS_OK};
use crate::routing::resolver::{HopResolver, ResolveContext};

/// Everything the relay needs to either answer or forward a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopPlan {
    /// Hop identifiers still to visit, next hop first.
    pub remaining_hops: Vec<String>,

    /// URL of the next hop; `None` iff `remaining_hops` is empty.
    pub next_hop_url: Option<String>,

    /// Log to render (terminal) or to send to the next hop (forwarding).
    pub log: HopLog,

    /// The inbound request carried no prior hops.
    pub origin: bool,
}

impl HopPlan {
    pub fn is_terminal(&self) -> bool {
        self.next_hop_url.is_none()
    }

    /// Identifier of the hop this service forwards to.
    pub fn next_hop(&self) -> Option<&str> {
        self.remaining_hops.first().map(String::as_str)
    }

    /// Index of the next hop's pending record in `log`.
    pub fn next_hop_index(&self) -> Option<usize> {
        if self.is_terminal() {
            None
        } else {
            self.log.len().checked_sub(1)
        }
    }
}

/// Inputs shared by every plan an instance makes.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    /// Name used for this service's record on origin calls.
    pub service_name: &'a str,
    /// Scheme of next-hop URLs.
    pub protocol: &'a str,
    pub resolver: &'a dyn HopResolver,
}

impl Planner<'_> {
    /// Plan a request for `path` (without leading slash) given the decoded inbound log.
    pub fn plan(&self, path: &str, inbound: HopLog, request_host: Option<&str>) -> HopPlan {
        let remaining_hops = split_hops(path);
        let origin = inbound.is_empty();
        let mut log = inbound;

        // The caller normally announces us as its pending last record.
        if log.last().map_or(true, |r| !r.is_pending()) {
            log.push(HopRecord::pending(self.service_name));
        }
        log.annotate_last(STATUS_OK);

        let Some((next_hop, rest)) = remaining_hops.split_first() else {
            return HopPlan {
                remaining_hops,
                next_hop_url: None,
                log,
                origin,
            };
        };

        let ctx = ResolveContext {
            request_host,
            request_path: path,
        };
        let host = self.resolver.resolve_host(next_hop, &ctx);
        let next_hop_url = format!("{}://{}/{}", self.protocol, host, rest.join("/"));
        log.push(HopRecord::pending(next_hop.as_str()));

        HopPlan {
            remaining_hops,
            next_hop_url: Some(next_hop_url),
            log,
            origin,
        }
    }
}

/// Split a hop path on `/`, dropping empty segments.
pub fn split_hops(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
