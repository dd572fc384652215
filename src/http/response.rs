//! Response construction helpers.
//!
//! # Responsibilities
//! - Build the snapshot response served on a successful render
//! - Map origin transport failures to the proxy's error response

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Content type of rendered snapshots; also sent on the middleware request.
pub const HTML_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

/// Response carrying a rendered HTML snapshot.
pub fn snapshot_response(html: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)],
        Body::from(html),
    )
        .into_response()
}

/// Response served when the origin itself cannot be reached.
pub fn origin_unavailable() -> Response {
    (StatusCode::BAD_GATEWAY, "origin request failed").into_response()
}
