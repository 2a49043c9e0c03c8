//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay and comic handlers
//! - Wire up middleware (tracing, request ID, comic timeout)
//! - Bind server to listener
//! - Hand requests to the relay and render its reply

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, RelayConfig};
use crate::http::comic::{comic_handler, ComicSource};
use crate::http::request::{MakeHopRequestId, RequestFacts};
use crate::relay::Relay;
use crate::routing::HopResolver;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub comic: Option<Arc<ComicSource>>,
}

/// HTTP server for one relay instance.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ConfigError> {
        let config = Arc::new(config);
        let relay = Relay::new(config.clone())?;
        Self::from_relay(config, relay)
    }

    /// Create a server that resolves hops with `resolver` instead of `routing.mode`.
    pub fn with_resolver(
        config: RelayConfig,
        resolver: Arc<dyn HopResolver>,
    ) -> Result<Self, ConfigError> {
        let config = Arc::new(config);
        let relay = Relay::with_resolver(config.clone(), resolver)?;
        Self::from_relay(config, relay)
    }

    fn from_relay(config: Arc<RelayConfig>, relay: Relay) -> Result<Self, ConfigError> {
        let comic = if config.comic.enabled {
            Some(Arc::new(ComicSource::new(&config.comic)?))
        } else {
            None
        };

        let state = AppState {
            relay: Arc::new(relay),
            comic,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Relay routes carry no inbound timeout: their outbound deadline grows
    /// with the hops left, and a cut-off would lose the hop log.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut router = Router::new();
        if state.comic.is_some() {
            let timeout = Duration::from_secs(config.http.request_timeout_secs);
            router = router.route(
                "/xkcd",
                get(comic_handler).layer(TimeoutLayer::new(timeout)),
            );
        }
        router
            .route("/", get(relay_handler))
            .route("/{*path}", get(relay_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeHopRequestId))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.service.name,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay handler for `/` and `/<hop-path>`.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let facts = RequestFacts::from_request(&request, &state.relay.config().http);
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());

    tracing::debug!(
        request_id = facts.request_id.as_deref().unwrap_or("-"),
        path = %facts.path,
        remote = remote.as_deref().unwrap_or("-"),
        "Relay request"
    );

    // Detached so a disconnecting client does not cancel the outbound call.
    let relay = state.relay.clone();
    let task = tokio::spawn(async move { relay.handle(facts.as_inbound()).await });

    match task.await {
        Ok(Ok(reply)) => reply.into_response(),
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "Request rejected");
            e.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Relay task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hoplog::{self, HopLog, HopRecord};
    use crate::relay::ResponsePayload;
    use axum::http::header;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = RelayConfig::default();
        config.service.name = "svc-a".into();
        config.service.secret = "a-secret".into();
        config.comic.enabled = false;
        HttpServer::new(config).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_favicon_is_404() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/favicon.ico")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_json() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("X-Chain-Fmt", "json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let payload: ResponsePayload = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(payload.secret, "a-secret");
        assert_eq!(payload.log.records(), &[HopRecord::with_status("svc-a", 200)]);
    }

    #[tokio::test]
    async fn test_root_html_by_default() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let body = body_string(response).await;
        assert!(body.contains("<h4>a-secret</h4>"));
        assert!(body.contains("<svg"));
    }

    #[tokio::test]
    async fn test_request_id_is_preserved() {
        let log: HopLog = vec![
            HopRecord::with_status("svc-x", 200),
            HopRecord::pending("svc-a"),
        ]
        .into();
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("X-Svc-Log", hoplog::encode(&log))
                    .header("x-request-id", "chain-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "chain-42");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_slow_hop_outlasts_request_timeout() {
        // Accepts and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let mut config = RelayConfig::default();
        config.service.name = "svc-a".into();
        config.comic.enabled = false;
        config.http.request_timeout_secs = 1;
        config.upstream.timeout_base_ms = 1500;
        config.upstream.timeout_per_hop_ms = 250;
        config.routing.mode = crate::config::ResolverMode::Static;
        config.routing.hosts.insert("svcB".into(), addr.to_string());

        let response = HttpServer::new(config)
            .unwrap()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/svcB")
                    .header("X-Chain-Fmt", "json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload: ResponsePayload = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(payload.secret, "error");
        assert_eq!(payload.log.last(), Some(&HopRecord::with_status("svcB", 408)));
    }

    #[tokio::test]
    async fn test_xkcd_is_a_hop_when_comic_disabled() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/xkcd")
                    .header("X-Chain-Fmt", "json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Nobody resolves "xkcd" as a host here, so the hop is recorded as failed.
        let payload: ResponsePayload = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(payload.log.len(), 2);
        assert_eq!(payload.log.get(1).unwrap().service_name, "xkcd");
        assert!(payload.log.get(1).unwrap().status.is_some());
    }
}
