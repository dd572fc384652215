//! Request classification subsystem.
//!
//! # Data Flow
//! ```text
//! absolute request URL ──→ resource.rs (static asset?)
//! User-Agent header    ──→ agent.rs (crawler signature?)
//!                            ↓
//!                 Classification { is_resource, is_bot_agent }
//!                            ↓
//!             dispatcher picks the prerender or origin lane
//! ```
//!
//! # Design Decisions
//! - Classification is a pure function of the request; both fields are
//!   computed independently so the result does not depend on evaluation order
//! - Filters are built once from validated configuration and shared behind
//!   the application state

pub mod agent;
pub mod resource;

pub use agent::AgentFilter;
pub use resource::ResourceFilter;

use crate::config::PrerenderConfig;

/// Result of classifying a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// URL has a file-extension-like suffix.
    pub is_resource: bool,
    /// User-Agent carries a known crawler signature.
    pub is_bot_agent: bool,
}

impl Classification {
    /// A request is prerendered only when it is a page asked for by a bot.
    pub fn wants_prerender(&self) -> bool {
        !self.is_resource && self.is_bot_agent
    }
}

/// Combined classifier handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct Classifier {
    resource: ResourceFilter,
    agent: AgentFilter,
}

impl Classifier {
    /// Build both filters from configuration. Fails only on a resource
    /// pattern the validator would already have rejected.
    pub fn from_config(config: &PrerenderConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            resource: ResourceFilter::new(&config.resource_pattern)?,
            agent: AgentFilter::new(&config.bot_agents),
        })
    }

    /// Classify one request by URL and User-Agent.
    pub fn classify(&self, url: &str, user_agent: &str) -> Classification {
        Classification {
            is_resource: self.resource.is_resource(url),
            is_bot_agent: self.agent.is_bot(user_agent),
        }
    }
}
