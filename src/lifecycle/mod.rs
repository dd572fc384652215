//! Process lifecycle.
//!
//! # Design Decisions
//! - One broadcast channel fans the stop signal out to every long-running
//!   task
//! - ctrl-c and programmatic triggers (tests) go through the same path

pub mod shutdown;

pub use shutdown::Shutdown;
