//! Prerender subsystem.
//!
//! # Data Flow
//! ```text
//! bot page request
//!     → fetcher.rs (render loop against the middleware)
//!         → 200: snapshot response (text/html;charset=UTF-8)
//!         → anything else: plain origin fetch of the original request
//! ```
//!
//! # Design Decisions
//! - The fallback forwards the original request untouched; the origin never
//!   learns the middleware was tried first
//! - The dispatcher records which lane answered, so rendered and fallback
//!   traffic stay distinguishable in metrics

pub mod fetcher;

pub use fetcher::{PrerenderFetcher, RenderOutcome};

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::http::request::RequestIdExt;
use crate::http::response;
use crate::origin::OriginClient;

/// How a prerender-eligible request ended up being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// Middleware snapshot.
    Rendered,
    /// Origin response after the middleware failed.
    Fallback,
}

impl Served {
    /// Metric label for the lane.
    pub fn lane(&self) -> &'static str {
        match self {
            Served::Rendered => "prerender",
            Served::Fallback => "fallback",
        }
    }
}

/// Render-or-fall-back orchestration for bot page requests.
#[derive(Clone)]
pub struct PrerenderService {
    fetcher: PrerenderFetcher,
    origin: Arc<OriginClient>,
}

impl PrerenderService {
    pub fn new(fetcher: PrerenderFetcher, origin: Arc<OriginClient>) -> Self {
        Self { fetcher, origin }
    }

    /// Serve a snapshot for `url`, or fall back to a plain origin fetch of
    /// the original request when the middleware cannot deliver one.
    pub async fn respond(&self, request: Request<Body>, url: &str) -> (Response, Served) {
        let request_id = request.request_id().to_string();
        match self.fetcher.fetch_rendered(url).await {
            RenderOutcome::Rendered { html, attempts } => {
                tracing::info!(
                    request_id = %request_id,
                    url = %url,
                    attempts,
                    "serving prerendered snapshot"
                );
                (response::snapshot_response(html), Served::Rendered)
            }
            RenderOutcome::Failed {
                attempts,
                last_status,
            } => {
                tracing::warn!(
                    request_id = %request_id,
                    url = %url,
                    attempts,
                    last_status = ?last_status,
                    "prerender middleware failed, serving origin response"
                );
                (self.origin.relay(request).await, Served::Fallback)
            }
        }
    }
}
