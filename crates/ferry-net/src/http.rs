//! HTTP fetcher
//!
//! reqwest's blocking client, run on smol's blocking thread pool so the
//! navigation task itself never blocks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use url::{Origin, Url};

use crate::{Fetcher, NetError, PageRequest, RequestMode};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Per-request timeout enforced by the client
    pub request_timeout: Duration,
    /// Max redirects to follow
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "Ferry/0.1".into(),
            request_timeout: Duration::from_secs(30),
            max_redirects: 10,
        }
    }
}

/// Fetcher for pages served over HTTP(S)
///
/// Navigation requests are restricted to the site's origin, carry the
/// session's cookies and never follow a redirect that leaves the origin:
/// such a redirect surfaces as a non-success status instead. Script
/// requests may go anywhere.
pub struct HttpFetcher {
    origin: Origin,
    navigation: Client,
    scripts: Client,
}

impl HttpFetcher {
    /// Create a fetcher for the origin of `site`
    pub fn new(site: &Url) -> Result<Self, NetError> {
        Self::with_config(site, ClientConfig::default())
    }

    pub fn with_config(site: &Url, config: ClientConfig) -> Result<Self, NetError> {
        let origin = site.origin();
        let jar = Arc::new(Jar::default());

        let allowed = origin.clone();
        let max_redirects = config.max_redirects;
        let same_origin_redirects = Policy::custom(move |attempt| {
            if attempt.previous().len() >= max_redirects {
                attempt.error("too many redirects")
            } else if attempt.url().origin() == allowed {
                attempt.follow()
            } else {
                attempt.stop()
            }
        });

        let navigation = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .cookie_provider(jar.clone())
            .redirect(same_origin_redirects)
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;

        let scripts = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .cookie_provider(jar)
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;

        Ok(Self {
            origin,
            navigation,
            scripts,
        })
    }

    /// Origin navigation requests are restricted to
    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, request: &PageRequest) -> impl Future<Output = Result<String, NetError>> {
        let client = match request.mode {
            RequestMode::SameOrigin => self.navigation.clone(),
            RequestMode::NoCors => self.scripts.clone(),
        };
        let allowed =
            request.mode == RequestMode::NoCors || request.url.origin() == self.origin;
        let url = request.url.clone();
        let headers = request.headers.clone();

        async move {
            if !allowed {
                return Err(NetError::CrossOrigin(url));
            }
            if !matches!(url.scheme(), "http" | "https") {
                return Err(NetError::InvalidUrl(url.to_string()));
            }

            tracing::info!("HTTP GET {}", url);
            smol::unblock(move || {
                let mut builder = client.get(url);
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }

                let response = builder
                    .send()
                    .map_err(|e| NetError::Network(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(NetError::HttpError {
                        status: status.as_u16(),
                    });
                }
                response.text().map_err(|e| NetError::Network(e.to_string()))
            })
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_origin_navigation_refused() {
        let site = Url::parse("https://labs.example/").unwrap();
        let fetcher = HttpFetcher::new(&site).unwrap();
        let other = Url::parse("https://elsewhere.example/page").unwrap();

        let result = smol::block_on(fetcher.fetch(&PageRequest::navigation(&other)));
        assert!(matches!(result, Err(NetError::CrossOrigin(_))));
    }

    #[test]
    fn test_non_http_script_refused() {
        let site = Url::parse("https://labs.example/").unwrap();
        let fetcher = HttpFetcher::new(&site).unwrap();
        let data = Url::parse("data:text/javascript,1").unwrap();

        let result = smol::block_on(fetcher.fetch(&PageRequest::script(&data)));
        assert!(matches!(result, Err(NetError::InvalidUrl(_))));
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.starts_with("Ferry"));
    }
}
