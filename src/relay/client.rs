//! Outbound call to the next hop.
//!
//! # Responsibilities
//! - Build the GET with the encoded hop log, format and request-id headers
//! - Enforce the deadline over the whole exchange, body included
//! - Classify transport failures into relay errors
//!
//! # Design Decisions
//! - Exactly one attempt; failures become data, never retries
//! - Any transport error other than the deadline counts as unreachable

use std::time::Duration;

use axum::body::Body;
use axum::http::header::InvalidHeaderName;
use axum::http::{HeaderName, Method, Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::HttpConfig;
use crate::hoplog::{self, HopLog};
use crate::http::request::X_REQUEST_ID;
use crate::relay::error::RelayError;
use crate::relay::payload::{Downstream, ResponseFormat};

/// Upper bound on a downstream body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// HTTP client used to call the next hop.
#[derive(Clone)]
pub struct HopClient {
    client: Client<HttpConnector, Body>,
    log_header: HeaderName,
    format_header: HeaderName,
}

impl HopClient {
    pub fn new(http: &HttpConfig) -> Result<Self, InvalidHeaderName> {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            log_header: HeaderName::from_bytes(http.log_header.as_bytes())?,
            format_header: HeaderName::from_bytes(http.format_header.as_bytes())?,
        })
    }

    /// GET `url` carrying `log`, giving up after `deadline`.
    pub async fn fetch(
        &self,
        url: &str,
        log: &HopLog,
        request_id: Option<&str>,
        deadline: Duration,
    ) -> Result<Downstream, RelayError> {
        let unreachable = |reason: String| RelayError::DownstreamUnreachable {
            url: url.to_string(),
            reason,
        };

        let uri: Uri = url
            .parse()
            .map_err(|e| unreachable(format!("invalid next hop URL: {e}")))?;

        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(&self.log_header, hoplog::encode(log))
            .header(&self.format_header, ResponseFormat::Json.as_str());
        if let Some(id) = request_id {
            builder = builder.header(X_REQUEST_ID, id);
        }
        let request = builder
            .body(Body::empty())
            .map_err(|e| unreachable(e.to_string()))?;

        let exchange = async {
            let response: Response<Incoming> = self
                .client
                .request(request)
                .await
                .map_err(|e| unreachable(error_chain(&e)))?;
            let status = response.status();
            let body = axum::body::to_bytes(Body::new(response.into_body()), MAX_BODY_BYTES)
                .await
                .map_err(|e| unreachable(error_chain(&e)))?;
            Ok::<_, RelayError>(Downstream { status, body })
        };

        match tokio::time::timeout(deadline, exchange).await {
            Ok(result) => result,
            Err(_) => Err(RelayError::DownstreamTimeout {
                url: url.to_string(),
                after: deadline,
            }),
        }
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hoplog::HopRecord;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client() -> HopClient {
        HopClient::new(&HttpConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_refused_is_unreachable() {
        // Bind then drop to get a port nobody listens on.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let url = format!("http://{addr}/");

        let err = client()
            .fetch(&url, &HopLog::new(), None, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::DownstreamUnreachable { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_is_unreachable() {
        let err = client()
            .fetch("http://bad host/", &HopLog::new(), None, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::DownstreamUnreachable { .. }));
    }

    #[tokio::test]
    async fn test_silent_peer_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and never answer.
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = client()
            .fetch(&format!("http://{addr}/"), &HopLog::new(), None, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::DownstreamTimeout { .. }));
    }

    #[tokio::test]
    async fn test_sends_hop_log_header() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<String>();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());
            let body = r#"{"service_secret":"s","service_log":[]}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
        });

        let log: HopLog = vec![HopRecord::pending("b")].into();
        let downstream = client()
            .fetch(&format!("http://{addr}/c"), &log, Some("req-1"), Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(downstream.status.as_u16(), 200);

        let raw = rx.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("get /c http/1.1"));
        assert!(raw.contains(&format!("x-svc-log: {}", hoplog::encode(&log).to_ascii_lowercase())));
        assert!(raw.contains("x-chain-fmt: json"));
        assert!(raw.contains("x-request-id: req-1"));
    }
}
