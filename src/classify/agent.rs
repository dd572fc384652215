//! Crawler user-agent detection.
//!
//! # Responsibilities
//! - Decide whether a User-Agent header identifies a crawler or link-preview
//!   fetcher that should receive prerendered HTML
//!
//! # Design Decisions
//! - Signatures match as substrings with both sides lowercased, so matching
//!   is case-insensitive overall
//! - An absent or empty User-Agent is never a bot

/// Matches User-Agent strings against a crawler signature list.
#[derive(Debug, Clone)]
pub struct AgentFilter {
    signatures: Vec<String>,
}

impl AgentFilter {
    /// Build a filter; signatures are normalized to lowercase.
    pub fn new<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            signatures: signatures
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns true if the user agent carries any known crawler signature.
    pub fn is_bot(&self, user_agent: &str) -> bool {
        if user_agent.is_empty() {
            return false;
        }
        let user_agent = user_agent.to_lowercase();
        self.signatures
            .iter()
            .any(|signature| user_agent.contains(signature.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrerenderConfig;

    fn default_filter() -> AgentFilter {
        AgentFilter::new(PrerenderConfig::default().bot_agents)
    }

    #[test]
    fn known_crawlers_match() {
        let filter = default_filter();
        assert!(filter.is_bot("Googlebot/2.1 (+http://www.google.com/bot.html)"));
        assert!(filter.is_bot("Twitterbot/1.0"));
        assert!(filter.is_bot("facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)"));
        assert!(filter.is_bot("Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)"));
        assert!(filter.is_bot("WhatsApp/2.19.81 A"));
    }

    #[test]
    fn matching_ignores_case() {
        let filter = default_filter();
        assert!(filter.is_bot("GOOGLEBOT"));
        assert!(filter.is_bot("FaceBot/1.0"));
        assert!(filter.is_bot("W3C_Validator/1.3"));
        assert!(filter.is_bot("vkShare; +http://vk.com/dev/Share"));
    }

    #[test]
    fn browsers_do_not_match() {
        let filter = default_filter();
        assert!(!filter.is_bot(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
        ));
        assert!(!filter.is_bot("curl/8.4.0"));
    }

    #[test]
    fn empty_user_agent_is_not_a_bot() {
        assert!(!default_filter().is_bot(""));
    }

    #[test]
    fn custom_signatures_are_normalized() {
        let filter = AgentFilter::new(["MySpider"]);
        assert!(filter.is_bot("myspider/0.1"));
        assert!(!filter.is_bot("Googlebot/2.1"));
    }
}
