//! Location
//!
//! The window's current URL, plus a record of the full page loads that were
//! requested by assigning to it.

use url::Url;

/// Location state
#[derive(Debug, Clone)]
pub struct Location {
    url: Url,
    loads: Vec<Url>,
}

impl Location {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            loads: Vec::new(),
        }
    }

    pub fn parse(href: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(href)?))
    }

    /// Current URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Full URL
    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    /// Pathname
    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Check whether `other` shares this location's origin
    pub fn is_same_origin(&self, other: &Url) -> bool {
        self.url.origin() == other.origin()
    }

    /// Resolve an href against the current URL
    pub fn resolve(&self, href: &str) -> Result<Url, url::ParseError> {
        self.url.join(href)
    }

    /// Change the URL without loading anything (history.pushState)
    pub(crate) fn set_url(&mut self, url: Url) {
        self.url = url;
    }

    /// Navigate with a full page load (`location.href = url`)
    pub fn assign(&mut self, url: Url) {
        tracing::info!("Full page load of {}", url);
        self.loads.push(url.clone());
        self.url = url;
    }

    /// Full page loads requested so far, oldest first
    pub fn loads(&self) -> &[Url] {
        &self.loads
    }

    /// Most recently requested full page load
    pub fn pending_load(&self) -> Option<&Url> {
        self.loads.last()
    }
}
