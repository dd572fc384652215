//! Static-resource detection.
//!
//! # Responsibilities
//! - Decide whether a URL points at a static asset or a navigable page
//!
//! # Design Decisions
//! - File-extension heuristic, not a MIME lookup: anything ending in a dot
//!   followed by alphanumerics counts as a resource
//! - The pattern comes from configuration and is compiled once at startup

use regex::Regex;

/// Classifies URLs as static resources by suffix pattern.
#[derive(Debug, Clone)]
pub struct ResourceFilter {
    pattern: Regex,
}

impl ResourceFilter {
    /// Compile a resource filter from a pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns true if the URL looks like a static asset rather than a page.
    pub fn is_resource(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}
