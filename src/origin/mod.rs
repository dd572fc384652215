//! Origin passthrough.
//!
//! # Responsibilities
//! - Forward requests to the configured origin with method, headers, and
//!   body intact; only scheme and authority of the URI are rewritten
//! - Relay the origin response verbatim (status, headers, body)
//!
//! # Design Decisions
//! - No retries and no transformation on this path; the origin sees exactly
//!   what the client sent
//! - A transport failure answers 502 instead of bubbling into the handler

use std::str::FromStr;

use axum::body::Body;
use axum::http::uri::{Authority, InvalidUri, PathAndQuery, Scheme, Uri};
use axum::http::Request;
use axum::response::Response;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use thiserror::Error;

use crate::http::request::RequestIdExt;
use crate::http::response;

/// Errors raised while forwarding a request to the origin.
#[derive(Debug, Error)]
pub enum OriginError {
    /// The rewritten URI could not be assembled.
    #[error("invalid origin URI: {0}")]
    Uri(#[from] axum::http::uri::InvalidUriParts),

    /// The outbound request could not be rebuilt.
    #[error("request rebuild failed: {0}")]
    Request(#[from] axum::http::Error),

    /// The origin could not be reached or broke the connection.
    #[error("origin request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
}

/// Forwards requests to the single configured origin.
#[derive(Clone)]
pub struct OriginClient {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl OriginClient {
    /// Build a forwarder for the given origin authority.
    pub fn new(client: Client<HttpConnector, Body>, address: &str) -> Result<Self, InvalidUri> {
        Ok(Self {
            client,
            authority: Authority::from_str(address)?,
        })
    }

    /// Forward the request as-is and relay the origin response verbatim.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, OriginError> {
        let (parts, body) = request.into_parts();

        let mut uri_parts = parts.uri.into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        let uri = Uri::from_parts(uri_parts)?;

        let mut outbound = Request::builder()
            .method(parts.method)
            .uri(uri)
            .version(parts.version)
            .body(body)?;
        *outbound.headers_mut() = parts.headers;

        let upstream: hyper::Response<hyper::body::Incoming> =
            self.client.request(outbound).await?;
        let (parts, body) = upstream.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }

    /// Forward, mapping transport failures to the proxy's 502 response.
    pub async fn relay(&self, request: Request<Body>) -> Response {
        let request_id = request.request_id().to_string();
        match self.forward(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "origin request failed");
                response::origin_unavailable()
            }
        }
    }
}
