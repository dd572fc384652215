//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logs via `tracing`; the subscriber is installed in main so
//!   tests can bring their own
//! - Metric updates are cheap recorder calls at the call site; the
//!   Prometheus exporter is optional and runs on its own listener

pub mod metrics;
