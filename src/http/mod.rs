//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, extract path and hop headers)
//!     → relay (plan, forward or terminate)
//!     → response.rs (JSON or HTML diagram)
//!     → Send to client
//! ```

pub mod comic;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeHopRequestId, RequestFacts, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
