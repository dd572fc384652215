//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router and wire middleware (timeout, request ID,
//!   tracing)
//! - Classify each request and pick a lane: prerender, fallback, or origin
//! - Record per-lane metrics at every exit
//!
//! # Design Decisions
//! - One wildcard route; the proxy has no opinions about paths
//! - A single outbound client is shared by the origin forwarder and the
//!   middleware fetcher, so both draw from the same connection pool

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request},
    response::IntoResponse,
    routing::any,
    Router,
};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::classify::Classifier;
use crate::config::{ConfigError, ProxyConfig, ValidationError};
use crate::http::request::{absolute_request_url, RequestIdExt, RequestIdLayer};
use crate::observability::metrics;
use crate::origin::OriginClient;
use crate::prerender::{PrerenderFetcher, PrerenderService};

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub prerender: Arc<PrerenderService>,
    pub origin: Arc<OriginClient>,
}

/// HTTP server for the prerender proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Assemble the server from a validated configuration.
    ///
    /// Only configuration the validator already rejects can fail here, so a
    /// config that passed `load_config` always builds.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client: Client<HttpConnector, Body> = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(config.timeouts.idle_secs))
            .build(connector);

        let classifier = Classifier::from_config(&config.prerender).map_err(|e| {
            ConfigError::Validation(vec![ValidationError {
                field: "prerender.resource_pattern",
                message: e.to_string(),
            }])
        })?;

        let origin = OriginClient::new(client.clone(), &config.origin.address).map_err(|e| {
            ConfigError::Validation(vec![ValidationError {
                field: "origin.address",
                message: e.to_string(),
            }])
        })?;
        let origin = Arc::new(origin);

        let fetcher = PrerenderFetcher::new(client, &config.prerender);
        let state = AppState {
            classifier: Arc::new(classifier),
            prerender: Arc::new(PrerenderService::new(fetcher, origin.clone())),
            origin,
        };

        Ok(Self {
            router: Self::build_router(&config, state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until ctrl-c or the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let address = listener.local_addr()?;
        tracing::info!(address = %address, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Request dispatcher.
///
/// Pages requested by crawler agents take the prerender lane; everything
/// else is relayed to the origin untouched.
async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> impl IntoResponse {
    let start = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().to_string();
    let url = absolute_request_url(&request);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    let classification = state.classifier.classify(&url, &user_agent);
    tracing::debug!(
        request_id = %request_id,
        peer = %peer,
        method = %method,
        url = %url,
        user_agent = %user_agent,
        is_resource = classification.is_resource,
        is_bot_agent = classification.is_bot_agent,
        "dispatching request"
    );

    if classification.wants_prerender() {
        let (response, served) = state.prerender.respond(request, &url).await;
        metrics::record_request(&method, response.status().as_u16(), served.lane(), start);
        return response;
    }

    let response = state.origin.relay(request).await;
    metrics::record_request(&method, response.status().as_u16(), "origin", start);
    response
}

/// Wait for ctrl-c or an explicit shutdown trigger.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = shutdown.recv() => {}
    }
    tracing::info!("shutdown signal received");
}
