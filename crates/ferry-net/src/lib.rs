//! Ferry Networking
//!
//! Fetching destination pages and keeping the markup of visited pages for
//! the rest of the session.

pub mod cache;
mod dir;
mod http;
pub mod loader;

use std::future::Future;
use std::time::Duration;

pub use cache::{cache_key, CachePolicy, PageCache};
pub use dir::DirectoryFetcher;
pub use http::{ClientConfig, HttpFetcher};
pub use loader::PageLoader;
pub use url::Url;

/// Header marking a request as an in-page navigation fetch
pub const DEFAULT_MARKER_HEADER: (&str, &str) = ("X-Requested-With", "Fetch");

/// Request mode, after the Fetch standard's modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Only URLs on the fetcher's own origin, credentials included
    #[default]
    SameOrigin,
    /// Classic script loads, which may leave the origin
    NoCors,
}

/// A GET request for a page or script body
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub url: Url,
    pub mode: RequestMode,
    pub headers: Vec<(String, String)>,
}

impl PageRequest {
    /// Same-origin request for a destination page
    pub fn navigation(url: &Url) -> Self {
        Self {
            url: without_fragment(url),
            mode: RequestMode::SameOrigin,
            headers: Vec::new(),
        }
    }

    /// Request for an external script source
    pub fn script(url: &Url) -> Self {
        Self {
            url: without_fragment(url),
            mode: RequestMode::NoCors,
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Get header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// Anything that can turn a request into response text
pub trait Fetcher {
    /// Fetch the body of `request`. Non-2xx responses are errors.
    fn fetch(&self, request: &PageRequest) -> impl Future<Output = Result<String, NetError>>;
}

impl<F: Fetcher> Fetcher for &F {
    fn fetch(&self, request: &PageRequest) -> impl Future<Output = Result<String, NetError>> {
        (**self).fetch(request)
    }
}

/// Network error
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Cross-origin request refused: {0}")]
    CrossOrigin(Url),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
