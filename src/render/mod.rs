//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! ResponsePayload (secret + HopLog)
//!     → structured: serialized as JSON by the relay
//!     → diagram:
//!         scene.rs (layout: nodes, edges, canvas size)
//!         → svg.rs (markup)
//!         → html.rs (display shell with the secret)
//! ```
//!
//! # Design Decisions
//! - Layout math and markup emission are separate so each can be tested alone
//! - Rendering never mutates the log
//! - All text taken from requests is escaped

pub mod html;
pub mod scene;
pub mod svg;

pub use html::render_page;
pub use scene::{canvas_width, Edge, EdgeStyle, Node, Scene};
pub use svg::{escape, to_svg};
