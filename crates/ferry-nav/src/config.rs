//! Engine configuration

use std::time::Duration;

use ferry_net::loader::DEFAULT_FETCH_TIMEOUT;
use ferry_net::{CachePolicy, DEFAULT_MARKER_HEADER};

/// Extensions of links that point at files rather than pages
pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "pdf", "zip", "mp4", "webm", "ogg",
];

/// Navigation engine configuration
#[derive(Debug, Clone)]
pub struct NavConfig {
    /// Selector of the region swapped on every navigation
    pub content_selector: String,
    /// Selector of the links that get the active class
    pub nav_link_selector: String,
    /// Class marking the link of the current page
    pub active_class: String,
    /// Attribute that makes an anchor fall through to a full load
    pub opt_out_attribute: String,
    /// Header sent with every page fetch (`None` to send none)
    pub marker_header: Option<(String, String)>,
    /// Fade-out time before the swap
    pub transition_duration: Duration,
    /// CSS easing of the fade
    pub transition_easing: String,
    /// Bound on a single network fetch
    pub fetch_timeout: Duration,
    /// Lowercase file extensions never intercepted
    pub asset_extensions: Vec<String>,
    /// Reuse policy of the page cache
    pub cache_policy: CachePolicy,
}

impl Default for NavConfig {
    fn default() -> Self {
        let (name, value) = DEFAULT_MARKER_HEADER;
        Self {
            content_selector: "#content".into(),
            nav_link_selector: "nav a, .site-nav a".into(),
            active_class: "active".into(),
            opt_out_attribute: "data-no-spa".into(),
            marker_header: Some((name.into(), value.into())),
            transition_duration: Duration::from_millis(180),
            transition_easing: "ease".into(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            asset_extensions: DEFAULT_ASSET_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            cache_policy: CachePolicy::Session,
        }
    }
}

impl NavConfig {
    pub fn builder() -> NavConfigBuilder {
        NavConfigBuilder::new()
    }

    /// Value of the region's `transition` style during a swap
    pub fn transition_style(&self) -> String {
        format!(
            "opacity {}ms {}",
            self.transition_duration.as_millis(),
            self.transition_easing
        )
    }
}

/// Navigation engine configuration builder
pub struct NavConfigBuilder {
    config: NavConfig,
}

impl NavConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: NavConfig::default(),
        }
    }

    pub fn content_selector(mut self, selector: &str) -> Self {
        self.config.content_selector = selector.to_string();
        self
    }

    pub fn nav_link_selector(mut self, selector: &str) -> Self {
        self.config.nav_link_selector = selector.to_string();
        self
    }

    pub fn active_class(mut self, class: &str) -> Self {
        self.config.active_class = class.to_string();
        self
    }

    pub fn opt_out_attribute(mut self, attr: &str) -> Self {
        self.config.opt_out_attribute = attr.to_string();
        self
    }

    pub fn marker_header(mut self, marker: Option<(&str, &str)>) -> Self {
        self.config.marker_header = marker.map(|(n, v)| (n.to_string(), v.to_string()));
        self
    }

    pub fn transition(mut self, duration: Duration, easing: &str) -> Self {
        self.config.transition_duration = duration;
        self.config.transition_easing = easing.to_string();
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    pub fn asset_extension(mut self, ext: &str) -> Self {
        self.config
            .asset_extensions
            .push(ext.trim_start_matches('.').to_ascii_lowercase());
        self
    }

    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.config.cache_policy = policy;
        self
    }

    pub fn build(self) -> NavConfig {
        self.config
    }
}

impl Default for NavConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NavConfig::default();
        assert_eq!(config.content_selector, "#content");
        assert_eq!(config.transition_style(), "opacity 180ms ease");
        assert!(config.asset_extensions.iter().any(|e| e == "pdf"));
        assert_eq!(
            config.marker_header,
            Some(("X-Requested-With".to_string(), "Fetch".to_string()))
        );
    }

    #[test]
    fn test_builder() {
        let config = NavConfig::builder()
            .content_selector("main")
            .transition(Duration::ZERO, "linear")
            .asset_extension(".WEBP")
            .marker_header(None)
            .build();

        assert_eq!(config.content_selector, "main");
        assert_eq!(config.transition_style(), "opacity 0ms linear");
        assert!(config.asset_extensions.iter().any(|e| e == "webp"));
        assert!(config.marker_header.is_none());
    }
}
