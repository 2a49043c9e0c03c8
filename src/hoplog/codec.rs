//! Header transport encoding for the hop log.
//!
//! The log travels as base64 (standard alphabet, padded) of compact JSON,
//! which keeps the header value ASCII-only.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::hoplog::record::HopLog;
use crate::observability::metrics;

/// Errors produced while reading an encoded hop log.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("hop log is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("hop log is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a hop log into a header-safe value.
pub fn encode(log: &HopLog) -> String {
    // Serializing a Vec of plain structs cannot fail.
    let json = serde_json::to_vec(log).unwrap_or_else(|_| b"[]".to_vec());
    STANDARD.encode(json)
}

/// Strictly decode a header value.
pub fn try_decode(value: &str) -> Result<HopLog, CodecError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(HopLog::new());
    }
    let bytes = STANDARD.decode(value)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decode a header value, treating absent or malformed input as an empty log.
///
/// This is how every relay reads its inbound header; a malformed value is
/// logged and counted, never surfaced to the caller.
pub fn decode(value: Option<&str>) -> HopLog {
    let Some(value) = value else {
        return HopLog::new();
    };
    match try_decode(value) {
        Ok(log) => log,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed hop log header");
            metrics::record_malformed_log();
            HopLog::new()
        }
    }
}
