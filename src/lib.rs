//! Prerender proxy library.
//!
//! An edge HTTP proxy that serves pre-rendered HTML snapshots to crawler
//! user agents and relays everything else to the origin untouched.

pub mod classify;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod origin;
pub mod prerender;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
