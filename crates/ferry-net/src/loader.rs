//! Page Loader
//!
//! The page cache in front of a `Fetcher`, plus the marker header and the
//! timeout every navigation fetch carries.

use std::cell::{Ref, RefCell};
use std::time::Duration;

use url::Url;

use crate::cache::{cache_key, CachePolicy, PageCache};
use crate::{Fetcher, NetError, PageRequest, DEFAULT_MARKER_HEADER};

/// Default bound on a single fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Cache-first page loader
pub struct PageLoader<F> {
    fetcher: F,
    cache: RefCell<PageCache>,
    marker: Option<(String, String)>,
    timeout: Duration,
}

impl<F: Fetcher> PageLoader<F> {
    pub fn new(fetcher: F, policy: CachePolicy) -> Self {
        let (name, value) = DEFAULT_MARKER_HEADER;
        Self {
            fetcher,
            cache: RefCell::new(PageCache::new(policy)),
            marker: Some((name.to_string(), value.to_string())),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Replace the navigation marker header (`None` sends no marker)
    pub fn with_marker(mut self, marker: Option<(String, String)>) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Read access to the page cache
    pub fn cache(&self) -> Ref<'_, PageCache> {
        self.cache.borrow()
    }

    /// Load page markup, from cache when possible
    pub async fn load(&self, url: &Url) -> Result<String, NetError> {
        self.load_if(url, || true).await
    }

    /// Load page markup, storing a freshly fetched body only if
    /// `still_wanted` holds once the response has arrived
    pub async fn load_if(
        &self,
        url: &Url,
        still_wanted: impl Fn() -> bool,
    ) -> Result<String, NetError> {
        let key = cache_key(url);
        let cached = self.cache.borrow_mut().get(&key);
        if let Some(markup) = cached {
            tracing::debug!("Cache hit for {}", key);
            return Ok(markup);
        }

        let mut request = PageRequest::navigation(url);
        if let Some((name, value)) = &self.marker {
            request = request.with_header(name, value);
        }

        tracing::debug!("Fetching from network: {}", key);
        let markup = self.fetch_bounded(&request).await?;

        if still_wanted() {
            self.cache.borrow_mut().put(&key, markup.clone());
            tracing::debug!("Cached {} ({} bytes)", key, markup.len());
        } else {
            tracing::debug!("Navigation to {} superseded; response not cached", key);
        }
        Ok(markup)
    }

    /// Run a request through the fetcher, failing with `Timeout` when it
    /// does not settle in time
    pub async fn fetch_bounded(&self, request: &PageRequest) -> Result<String, NetError> {
        let timeout = self.timeout;
        smol::future::or(self.fetcher.fetch(request), async move {
            smol::Timer::after(timeout).await;
            Err(NetError::Timeout(timeout))
        })
        .await
    }
}
