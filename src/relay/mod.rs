//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (path, headers)
//!     → handler.rs (denylist, decode log, plan)
//!     → terminal: payload.rs (own secret + log)
//!     → forwarding: client.rs (one GET, deadline enforced)
//!         → payload.rs (merge downstream answer or failure)
//!     → RelayReply (payload + negotiated format)
//! ```
//!
//! # Design Decisions
//! - At most one outbound call per inbound request
//! - No shared mutable state between requests
//! - Downstream failures are data: 503 refused, 408 timeout
//! - If the client disconnects the outbound call still runs to completion

pub mod client;
pub mod error;
pub mod handler;
pub mod payload;

pub use client::HopClient;
pub use error::RelayError;
pub use handler::{InboundRequest, Relay, RelayReply};
pub use payload::{Downstream, ResponseFormat, ResponsePayload, ERROR_SECRET};
