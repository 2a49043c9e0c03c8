//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay and HTTP layers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID is logged with every relay event and forwarded down the chain
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
