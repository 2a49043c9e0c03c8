//! Response payloads and format negotiation.
//!
//! # Responsibilities
//! - Build the terminal payload from this service's own secret
//! - Merge a downstream answer (or its failure) into the payload
//! - Pick between the structured and diagram forms
//!
//! # Design Decisions
//! - The downstream body is authoritative for secret and log
//! - The caller only stamps the status it observed on the next hop's record
//! - On any downstream failure the locally planned log is kept, so the
//!   successful prefix of the chain is never lost

use std::str::FromStr;

use axum::body::Bytes;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::hoplog::HopLog;
use crate::relay::error::{RelayError, STATUS_UNREACHABLE};

/// Secret reported when the chain did not complete.
pub const ERROR_SECRET: &str = "error";

/// Structured answer of a relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    #[serde(rename = "service_secret")]
    pub secret: String,

    #[serde(rename = "service_log")]
    pub log: HopLog,
}

/// Lenient view of a downstream body; either field may be missing.
#[derive(Debug, Deserialize)]
struct DownstreamBody {
    #[serde(default)]
    service_secret: Option<String>,
    #[serde(default)]
    service_log: Option<HopLog>,
}

/// Raw answer of the next hop.
#[derive(Debug, Clone)]
pub struct Downstream {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ResponsePayload {
    /// Payload of the service that ends the chain.
    pub fn terminal(secret: impl Into<String>, log: HopLog) -> Self {
        Self {
            secret: secret.into(),
            log,
        }
    }

    /// Payload after forwarding to the hop at `next_index` of `planned`.
    ///
    /// Returns the payload and the status recorded for that hop.
    pub fn forwarded(
        url: &str,
        planned: HopLog,
        next_index: usize,
        outcome: Result<Downstream, RelayError>,
    ) -> (Self, u16) {
        let failure = match outcome {
            Ok(downstream) => match serde_json::from_slice::<DownstreamBody>(&downstream.body) {
                Ok(body) => {
                    let status = downstream.status.as_u16();
                    let mut log = match body.service_log {
                        Some(log) if log.len() > next_index => log,
                        _ => planned,
                    };
                    log.annotate(next_index, status);
                    let secret = body
                        .service_secret
                        .unwrap_or_else(|| ERROR_SECRET.to_string());
                    return (Self { secret, log }, status);
                }
                Err(source) => RelayError::DownstreamMalformedBody {
                    url: url.to_string(),
                    status: downstream.status.as_u16(),
                    source,
                },
            },
            Err(e) => e,
        };

        tracing::info!(error = %failure, kind = failure.kind(), "Next hop failed");
        let status = failure.synthetic_status().unwrap_or(STATUS_UNREACHABLE);
        let mut log = planned;
        log.annotate(next_index, status);
        (
            Self {
                secret: ERROR_SECRET.to_string(),
                log,
            },
            status,
        )
    }
}

/// Representation of the payload sent back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Html,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Html => "html",
        }
    }

    /// An explicit, recognised override wins. Otherwise only a service
    /// answering the origin caller draws the diagram; chained callers
    /// always get JSON they can parse.
    pub fn negotiate(requested: Option<&str>, origin: bool) -> Self {
        match requested.and_then(|v| v.parse().ok()) {
            Some(format) => format,
            None if origin => ResponseFormat::Html,
            None => ResponseFormat::Json,
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "html" => Ok(ResponseFormat::Html),
            _ => Err(()),
        }
    }
}
