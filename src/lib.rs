//! Self-chaining HTTP relay library.

pub mod config;
pub mod hoplog;
pub mod http;
pub mod lifecycle;
pub mod loadgen;
pub mod observability;
pub mod relay;
pub mod render;
pub mod routing;

pub use config::RelayConfig;
pub use hoplog::{HopLog, HopRecord};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{Relay, ResponsePayload};
