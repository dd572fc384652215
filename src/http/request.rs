//! Request identity and URL reconstruction.
//!
//! # Responsibilities
//! - Tag every inbound request with an `x-request-id` header for log
//!   correlation (an id supplied by the client is kept)
//! - Rebuild the absolute URL a request was addressed to; classification and
//!   the middleware target both work on that form

use std::task::{Context, Poll};

use axum::http::{header, HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Convenience accessor for the correlation id of a request.
pub trait RequestIdExt {
    /// The request's `x-request-id`, or "unknown" when absent.
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Layer assigning a UUID `x-request-id` to requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service produced by [`RequestIdLayer`].
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if !request.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                request.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(request)
    }
}

/// Rebuild the absolute URL of a request.
///
/// Proxied requests normally arrive in origin-form ("/page?q=1") with the
/// host in the Host header; absolute-form URIs are used as-is. The listener
/// speaks plain HTTP, so reconstruction uses the http scheme.
pub fn absolute_request_url<B>(request: &Request<B>) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
        .unwrap_or("localhost");
    format!("http://{}{}", host, uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    fn id_echo_service() -> impl Service<Request<Body>, Response = String, Error = Infallible> {
        RequestIdLayer.layer(service_fn(|request: Request<Body>| async move {
            Ok::<_, Infallible>(request.request_id().to_string())
        }))
    }

    #[tokio::test]
    async fn layer_assigns_an_id_when_missing() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let id = id_echo_service().oneshot(request).await.unwrap();
        assert_ne!(id, "unknown");
        assert_eq!(id.len(), 36); // uuid text form
    }

    #[tokio::test]
    async fn layer_keeps_an_existing_id() {
        let request = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        let id = id_echo_service().oneshot(request).await.unwrap();
        assert_eq!(id, "abc-123");
    }

    #[test]
    fn request_id_defaults_to_unknown() {
        let request = Request::builder().uri("/").body(()).unwrap();
        assert_eq!(request.request_id(), "unknown");
    }

    #[test]
    fn absolute_url_from_origin_form() {
        let request = Request::builder()
            .uri("/page?q=1")
            .header(header::HOST, "example.com")
            .body(())
            .unwrap();
        assert_eq!(
            absolute_request_url(&request),
            "http://example.com/page?q=1"
        );
    }

    #[test]
    fn absolute_form_uri_is_kept() {
        let request = Request::builder()
            .uri("http://other.test/x.png")
            .body(())
            .unwrap();
        assert_eq!(absolute_request_url(&request), "http://other.test/x.png");
    }

    #[test]
    fn missing_host_falls_back_to_localhost() {
        let request = Request::builder().uri("/").body(()).unwrap();
        assert_eq!(absolute_request_url(&request), "http://localhost/");
    }
}
