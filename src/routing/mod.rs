//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound path suffix + decoded HopLog
//!     → planner.rs (split hops, append records)
//!     → resolver.rs (hop identifier → host)
//!     → Return: HopPlan (terminal or next-hop URL)
//!
//! Resolver selection (at startup):
//!     routing.mode → Direct | Local | Static
//! ```
//!
//! # Design Decisions
//! - Chains are strictly linear: one next hop at most
//! - Resolver is injected; the planner never branches on debug flags
//! - Deterministic: same input always yields the same plan

pub mod planner;
pub mod resolver;

pub use planner::{split_hops, HopPlan, Planner};
pub use resolver::{
    from_config, DirectResolver, HopResolver, LocalResolver, ResolveContext, StaticResolver,
};
