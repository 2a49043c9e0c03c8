//! Hop log subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound X-Svc-Log header
//!     → codec.rs (base64 → JSON → HopLog, soft failure to empty)
//!     → record.rs (typed HopLog passed through planner and relay)
//!     → codec.rs (HopLog → JSON → base64) for the next hop
//! ```
//!
//! # Design Decisions
//! - Encoding/decoding happens only at the process boundary
//! - A missing or unreadable header is an empty log, never an error response
//! - Records are append-only; a record's status is written by the caller of that hop

pub mod codec;
pub mod record;

pub use codec::{decode, encode, try_decode, CodecError};
pub use record::{HopLog, HopRecord, STATUS_OK};
