//! Response rendering.
//!
//! # Responsibilities
//! - Turn a relay reply into JSON or an HTML page with the call graph
//! - Map relay errors to HTTP responses
//!
//! # Design Decisions
//! - A relay always answers 200; hop failures live in the payload
//! - Only the denylist produces a non-200 status

use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::relay::{RelayReply, ResponseFormat};
use crate::render::render_page;

impl IntoResponse for RelayReply {
    fn into_response(self) -> Response {
        match self.format {
            ResponseFormat::Json => Json(self.payload).into_response(),
            ResponseFormat::Html => {
                Html(render_page(&self.payload.secret, &self.payload.log)).into_response()
            }
        }
    }
}
